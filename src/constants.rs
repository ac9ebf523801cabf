// ABOUTME: System-wide constants for the objective-directed prompting service
// ABOUTME: Groups service names, environment keys, generation parameters, and route paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Constants are grouped by domain. Values that can be overridden at runtime
//! are read in [`crate::config::environment`], not here.

/// Service identity used in logs and health responses
pub mod service_names {
    /// Service name for structured logging
    pub const OBJECTIVE_PROMPTER: &str = "objective-prompter";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Environment variable names
pub mod env_keys {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Bind port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind port (legacy name)
    pub const PORT: &str = "PORT";
    /// Base URL of the OpenAI-compatible endpoint
    pub const LLM_BASE_URL: &str = "LLM_BASE_URL";
    /// Bearer key for the generation service
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Bearer key (provider-neutral name)
    pub const LLM_API_KEY: &str = "LLM_API_KEY";
    /// Model pinned for compression and evaluation
    pub const LLM_DEFAULT_MODEL: &str = "LLM_DEFAULT_MODEL";
    /// Connect timeout in seconds
    pub const LLM_CONNECT_TIMEOUT_SECS: &str = "LLM_CONNECT_TIMEOUT_SECS";
    /// Whole-request timeout in seconds
    pub const LLM_REQUEST_TIMEOUT_SECS: &str = "LLM_REQUEST_TIMEOUT_SECS";
    /// Root directory for results CSV files
    pub const RESULTS_DIR: &str = "RESULTS_DIR";
    /// Request body limit for uploads
    pub const MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
}

/// Defaults applied when the environment is silent
pub mod defaults {
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    /// Default bind port
    pub const HTTP_PORT: u16 = 8000;
    /// Default generation endpoint
    pub const LLM_BASE_URL: &str = "https://api.openai.com/v1";
    /// Model used when a call pins the default
    pub const MODEL: &str = "gpt-4o";
    /// Connect timeout
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Whole-request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;
    /// Results directory
    pub const RESULTS_DIR: &str = "results";
    /// Results file used when the caller gives no path
    pub const RESULTS_FILE: &str = "dataset_results.csv";
    /// 25 MiB
    pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
}

/// Sampling temperatures, one per operation
pub mod temperatures {
    /// Next-prompt generation: high variability keeps candidates from collapsing
    pub const PROMPT_GENERATION: f32 = 1.0;
    /// History compression
    pub const HISTORY_COMPRESSION: f32 = 0.5;
    /// Objective evaluation is a judgment
    pub const OBJECTIVE_EVALUATION: f32 = 0.0;
}

/// Keys of the structured results returned by each operation
pub mod result_keys {
    /// `PromptGenerator` output key
    pub const RESPONSE: &str = "response";
    /// `HistoryCompressor` output key
    pub const COMPRESSED_SUMMARY: &str = "compressed_summary";
    /// `ObjectiveEvaluator` output key
    pub const SUCCESS: &str = "success";
}

/// HTTP routing
pub mod routes {
    /// Prefix of the prompting and dataset endpoints
    pub const API_PREFIX: &str = "/api/v1/prompter";
    /// Header carrying the caller-supplied dataset session id
    pub const SESSION_HEADER: &str = "x-session-id";
    /// Session used when the header is absent
    pub const DEFAULT_SESSION: &str = "default";
}

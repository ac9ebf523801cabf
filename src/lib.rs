// ABOUTME: Main library entry point for the objective-directed prompting service
// ABOUTME: Generates next prompts, compresses histories, and judges objectives over an LLM endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Objective Prompter
//!
//! A request-orchestration layer that drives a multi-turn, objective-directed
//! conversation with an external language-generation service.
//!
//! ## Features
//!
//! - **Prompt generation**: the next strategically crafted user prompt toward an objective
//! - **History compression**: 3-4 line summaries that can be re-inserted as turns
//! - **Objective evaluation**: a boolean judgment on the latest assistant message
//! - **Datasets**: per-session CSV seed inputs and persisted `{prompt, response}` results
//!
//! ## Architecture
//!
//! - **`prompting`**: the three stateless operations and history rendering
//! - **`llm`**: provider trait, OpenAI-compatible client, structured-output validation
//! - **`dataset`**: uploaded tables and results files
//! - **`routes`** / **`server`**: the axum HTTP surface
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use objective_prompter::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Objective prompter configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// Dataset tables and results files
pub mod dataset;

/// Unified error handling
pub mod errors;

/// LLM provider abstraction and structured generation
pub mod llm;

/// Logging configuration
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Prompt generation, history compression, and objective evaluation
pub mod prompting;

/// HTTP route handlers
pub mod routes;

/// Application state and server loop
pub mod server;

// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses bind address, generation endpoint, and dataset storage settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use crate::constants::{defaults, env_keys};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Generation service settings
    pub llm: LlmConfig,
    /// Dataset and results storage settings
    pub datasets: DatasetConfig,
}

/// Settings for the OpenAI-compatible generation service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL (e.g. <https://api.openai.com/v1>)
    pub base_url: String,
    /// Bearer key; `None` for local servers
    pub api_key: Option<String>,
    /// Model pinned by compression and evaluation
    pub default_model: String,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Settings for the dataset side-concern
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Directory under which every results file is resolved
    pub results_dir: PathBuf,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LLM_BASE_URL.to_owned(),
            api_key: None,
            default_model: defaults::MODEL.to_owned(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(defaults::RESULTS_DIR),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            llm: LlmConfig::default(),
            datasets: DatasetConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_port = match get(env_keys::HTTP_PORT).or_else(|| get(env_keys::PORT)) {
            Some(raw) => parse_value::<u16>(env_keys::HTTP_PORT, &raw)?,
            None => defaults::HTTP_PORT,
        };

        let llm = LlmConfig {
            base_url: get(env_keys::LLM_BASE_URL)
                .unwrap_or_else(|| defaults::LLM_BASE_URL.to_owned()),
            api_key: get(env_keys::OPENAI_API_KEY).or_else(|| get(env_keys::LLM_API_KEY)),
            default_model: get(env_keys::LLM_DEFAULT_MODEL)
                .unwrap_or_else(|| defaults::MODEL.to_owned()),
            connect_timeout_secs: get(env_keys::LLM_CONNECT_TIMEOUT_SECS)
                .map(|raw| parse_value(env_keys::LLM_CONNECT_TIMEOUT_SECS, &raw))
                .transpose()?
                .unwrap_or(defaults::CONNECT_TIMEOUT_SECS),
            request_timeout_secs: get(env_keys::LLM_REQUEST_TIMEOUT_SECS)
                .map(|raw| parse_value(env_keys::LLM_REQUEST_TIMEOUT_SECS, &raw))
                .transpose()?
                .unwrap_or(defaults::REQUEST_TIMEOUT_SECS),
        };

        let datasets = DatasetConfig {
            results_dir: get(env_keys::RESULTS_DIR)
                .map_or_else(|| PathBuf::from(defaults::RESULTS_DIR), PathBuf::from),
            max_upload_bytes: get(env_keys::MAX_UPLOAD_BYTES)
                .map(|raw| parse_value(env_keys::MAX_UPLOAD_BYTES, &raw))
                .transpose()?
                .unwrap_or(defaults::MAX_UPLOAD_BYTES),
        };

        Ok(Self {
            host: get(env_keys::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
            http_port,
            llm,
            datasets,
        })
    }

    /// One-line description for startup logs; never includes the API key
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Objective Prompter Configuration: bind={}:{}, llm_base_url={}, api_key={}, \
             default_model={}, request_timeout={}s, results_dir={}, max_upload_bytes={}",
            self.host,
            self.http_port,
            self.llm.base_url,
            if self.llm.api_key.is_some() {
                "set"
            } else {
                "unset"
            },
            self.llm.default_model,
            self.llm.request_timeout_secs,
            self.datasets.results_dir.display(),
            self.datasets.max_upload_bytes,
        )
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Invalid {key} value: {raw}"))
}

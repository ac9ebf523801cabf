// ABOUTME: Generic OpenAI-compatible LLM provider for hosted and local endpoints
// ABOUTME: Sends non-streaming chat completions with optional JSON mode over reqwest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! Works with any endpoint implementing `POST {base_url}/chat/completions`:
//! `OpenAI` itself, Ollama, vLLM, and similar servers.
//!
//! Every failure this provider reports is a
//! [`ErrorCode::GenerationFailure`](crate::errors::ErrorCode::GenerationFailure);
//! the upstream status and provider name travel in the error details.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole,
    ResponseFormat, TokenUsage,
};
use crate::config::LlmConfig;
use crate::constants::defaults;
use crate::errors::AppError;
use crate::logging::preview;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
}

/// `response_format` object
#[derive(Debug, Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.openai.com/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl OpenAiCompatibleConfig {
    /// Configuration for the hosted `OpenAI` API
    #[must_use]
    pub fn openai(api_key: impl Into<String>, model: &str) -> Self {
        Self {
            base_url: defaults::LLM_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: model.to_owned(),
            provider_name: "openai".to_owned(),
            display_name: "OpenAI".to_owned(),
            ..Self::default()
        }
    }

    /// Configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(model: &str) -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_owned(),
            api_key: None,
            default_model: model.to_owned(),
            provider_name: "ollama".to_owned(),
            display_name: "Ollama (Local)".to_owned(),
            ..Self::default()
        }
    }

    /// Configuration for a local vLLM instance
    #[must_use]
    pub fn vllm(model: &str) -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_owned(),
            api_key: None,
            default_model: model.to_owned(),
            provider_name: "vllm".to_owned(),
            display_name: "vLLM (Local)".to_owned(),
            ..Self::default()
        }
    }

    /// Build from server configuration, detecting the backend from the URL
    #[must_use]
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider_name, display_name) = if config.base_url.contains("api.openai.com") {
            ("openai", "OpenAI")
        } else if config.base_url.contains(":11434") {
            ("ollama", "Ollama (Local)")
        } else if config.base_url.contains(":8000") {
            ("vllm", "vLLM (Local)")
        } else {
            ("openai-compatible", "OpenAI-Compatible")
        };

        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            default_model: config.default_model.clone(),
            provider_name: provider_name.to_owned(),
            display_name: display_name.to_owned(),
            capabilities: LlmCapabilities::json_chat(),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LLM_BASE_URL.to_owned(),
            api_key: None,
            default_model: defaults::MODEL.to_owned(),
            provider_name: "openai-compatible".to_owned(),
            display_name: "OpenAI-Compatible".to_owned(),
            capabilities: LlmCapabilities::json_chat(),
            connect_timeout: Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Convert internal messages to `OpenAI` format
    ///
    /// Without system-message support, system text is prepended to the
    /// first user message instead.
    fn convert_messages(&self, messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        if self.config.capabilities.supports_system_messages() {
            return messages.iter().map(OpenAiMessage::from).collect();
        }

        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        let mut pending_system = (!system_text.is_empty()).then(|| system_text.join("\n\n"));

        messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| {
                let mut converted = OpenAiMessage::from(m);
                if m.role == MessageRole::User {
                    if let Some(system) = pending_system.take() {
                        converted.content = format!("{system}\n\n{}", converted.content);
                    }
                }
                converted
            })
            .collect()
    }

    /// Wrap a message into a generation failure tagged with this provider
    fn failure(&self, message: impl Into<String>, status: Option<StatusCode>) -> AppError {
        AppError::generation(message).with_details(json!({
            "provider": self.config.provider_name,
            "upstream_status": status.map(|s| s.as_u16()),
        }))
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| format!("API error ({status}): {}", preview(body)),
            |error_response| {
                let error_type = error_response
                    .error
                    .error_type
                    .unwrap_or_else(|| "unknown".to_owned());
                match status.as_u16() {
                    401 | 403 => format!(
                        "API authentication failed: {}",
                        error_response.error.message
                    ),
                    429 => format!("Rate limit reached: {}", error_response.error.message),
                    404 => format!(
                        "Model or endpoint not found: {}",
                        error_response.error.message
                    ),
                    _ => format!("{error_type} - {}", error_response.error.message),
                }
            },
        );

        self.failure(message, Some(status))
    }

    /// Map a reqwest send/read error
    fn transport_error(&self, e: &reqwest::Error) -> AppError {
        error!(
            "Request to {} failed: {}",
            self.config.provider_name, e
        );
        if e.is_timeout() {
            self.failure(
                format!(
                    "{} did not respond within {}s",
                    self.config.display_name,
                    self.config.request_timeout.as_secs()
                ),
                None,
            )
        } else if e.is_connect() {
            self.failure(
                format!(
                    "Cannot connect to {} at {}",
                    self.config.display_name, self.config.base_url
                ),
                None,
            )
        } else {
            self.failure(format!("Failed to reach generation service: {e}"), None)
        }
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.bearer_auth(api_key)
        } else {
            request
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "openai" => "openai",
            "ollama" => "ollama",
            "vllm" => "vllm",
            _ => "openai-compatible",
        }
    }

    fn display_name(&self) -> &'static str {
        match self.config.provider_name.as_str() {
            "openai" => "OpenAI",
            "ollama" => "Ollama (Local)",
            "vllm" => "vLLM (Local)",
            _ => "OpenAI-Compatible",
        }
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(
        provider = %self.config.provider_name,
        model = %request.model.as_deref().unwrap_or(&self.config.default_model),
    ))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let response_format = (request.response_format == ResponseFormat::JsonObject
            && self.config.capabilities.supports_json_mode())
        .then_some(OpenAiResponseFormat {
            format_type: "json_object",
        });

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: self.convert_messages(&request.messages),
            temperature: request.temperature,
            stream: false,
            response_format,
        };

        debug!(
            "Sending chat completion to {} with {} messages, temperature={:?}",
            self.config.provider_name,
            openai_request.messages.len(),
            openai_request.temperature
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {} - body: {}", e, preview(&body));
            self.failure(format!("Failed to parse response envelope: {e}"), Some(status))
        })?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.failure("API returned no choices", Some(status)))?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!(
            "Performing {} health check at {}",
            self.config.provider_name, self.config.base_url
        );

        let http_request = self.client.get(self.api_url("models"));

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let healthy = response.status().is_success();

        if !healthy {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}

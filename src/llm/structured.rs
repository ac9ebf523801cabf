// ABOUTME: Structured-output invocation of the generation service with schema validation
// ABOUTME: Turns a model reply into a single-key JSON result or a GenerationFailure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Structured Generation
//!
//! Hosted models asked for JSON mode still occasionally return prose, a
//! fenced code block, or an object with the wrong key. [`GenerationService`]
//! treats the reply as untrusted: it parses it, checks the required key and
//! its type, and returns a [`StructuredResult`] holding exactly that key.
//! There is no partial success.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument, warn};

use super::{ChatMessage, ChatRequest, LlmProvider, ResponseFormat};
use crate::errors::{AppError, AppResult};
use crate::logging::{preview, AppLogger};

// ============================================================================
// Output Shape
// ============================================================================

/// JSON type required for the result value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// JSON string
    String,
    /// JSON boolean
    Boolean,
}

impl ValueKind {
    /// Whether `value` has this kind
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
        }
    }

    /// Name used in error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single key a reply must carry, and its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputShape {
    /// Required key
    pub key: String,
    /// Required value type
    pub kind: ValueKind,
}

impl OutputShape {
    /// `{key: string}`
    #[must_use]
    pub fn string(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: ValueKind::String,
        }
    }

    /// `{key: boolean}`
    #[must_use]
    pub fn boolean(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: ValueKind::Boolean,
        }
    }
}

// ============================================================================
// Request / Result
// ============================================================================

/// One immutable call to the generation service
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Target model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// System instruction
    pub system_instruction: String,
    /// User instruction
    pub user_instruction: String,
    /// Required output shape
    pub shape: OutputShape,
}

impl GenerationRequest {
    fn to_chat_request(&self) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::system(self.system_instruction.clone()),
            ChatMessage::user(self.user_instruction.clone()),
        ])
        .with_model(self.model.clone())
        .with_temperature(self.temperature)
        .with_response_format(ResponseFormat::JsonObject)
    }
}

/// A validated JSON object holding exactly the required key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StructuredResult(Map<String, Value>);

impl StructuredResult {
    /// String value under `key`
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Boolean value under `key`
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Consume into a JSON object value
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

// ============================================================================
// Parsing and Validation
// ============================================================================

/// Strip surrounding whitespace and a surrounding markdown code fence
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence line
    body.split_once('\n')
        .map_or(body, |(info, inner)| {
            if info.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
                inner
            } else {
                body
            }
        })
        .trim()
}

/// Parse and validate raw model output against `shape`
///
/// # Errors
///
/// Returns `GenerationFailure` if the content is not a JSON object carrying
/// `shape.key` with a value of `shape.kind`.
pub fn parse_structured(content: &str, shape: &OutputShape) -> AppResult<StructuredResult> {
    let candidate = strip_code_fence(content);

    let parsed: Value = serde_json::from_str(candidate).map_err(|e| {
        AppError::generation(format!("Generation service returned non-JSON output: {e}"))
            .with_details(json!({ "content_preview": preview(content) }))
    })?;

    let Value::Object(mut object) = parsed else {
        return Err(AppError::generation(
            "Generation service returned JSON that is not an object",
        )
        .with_details(json!({ "content_preview": preview(content) })));
    };

    let value = object.remove(&shape.key).ok_or_else(|| {
        AppError::generation(format!(
            "Generation service output is missing required key '{}'",
            shape.key
        ))
        .with_details(json!({ "keys": object.keys().collect::<Vec<_>>() }))
    })?;

    if !shape.kind.matches(&value) {
        return Err(AppError::generation(format!(
            "Generation service output key '{}' must be a {}",
            shape.key, shape.kind
        )));
    }

    if !object.is_empty() {
        warn!(
            "Dropping {} unexpected key(s) from generation output: {:?}",
            object.len(),
            object.keys().collect::<Vec<_>>()
        );
    }

    let mut result = Map::new();
    result.insert(shape.key.clone(), value);
    Ok(StructuredResult(result))
}

// ============================================================================
// Service
// ============================================================================

/// Invokes the generation service and enforces the structured-output contract
#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn LlmProvider>,
}

impl GenerationService {
    /// Wrap a provider
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Underlying provider
    #[must_use]
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Model pinned by operations that do not take one from the caller
    #[must_use]
    pub fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    /// Run one generation call and return the validated result
    ///
    /// # Errors
    ///
    /// - `ConfigurationError` if the model identifier is blank
    /// - `GenerationFailure` on transport failure, timeout, or a reply that
    ///   does not match `request.shape`
    #[instrument(skip(self, request), fields(
        provider = %self.provider.name(),
        model = %request.model,
        temperature = request.temperature,
        key = %request.shape.key,
    ))]
    pub async fn invoke(&self, request: &GenerationRequest) -> AppResult<StructuredResult> {
        if request.model.trim().is_empty() {
            return Err(AppError::configuration("model identifier must not be empty"));
        }

        debug!(
            "System instruction: {}",
            preview(&request.system_instruction)
        );
        debug!("User instruction: {}", preview(&request.user_instruction));

        let started = Instant::now();
        let outcome = match self.provider.complete(&request.to_chat_request()).await {
            Ok(response) => {
                debug!("Raw generation output: {}", preview(&response.content));
                parse_structured(&response.content, &request.shape)
            }
            Err(e) => Err(e),
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_generation_call(
            &request.shape.key,
            &request.model,
            request.temperature,
            outcome.is_ok(),
            duration_ms,
        );

        outcome
    }
}

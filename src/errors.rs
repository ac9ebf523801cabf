// ABOUTME: Unified error type, error codes, and HTTP error responses for the prompting service
// ABOUTME: Separates caller input errors from upstream generation failures at the HTTP boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Every operation in the crate returns [`AppResult`]. An [`AppError`] carries an
//! [`ErrorCode`] that decides the HTTP status and the serialized code, so a
//! caller can always tell "bad input" (4xx) from "upstream generation problem"
//! (502) without parsing messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Caller input (400)
    /// Malformed request body or parameter
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// History entry is neither a raw turn nor a compressed summary
    #[serde(rename = "INVALID_HISTORY_ENTRY")]
    InvalidHistoryEntry,
    /// Missing or blank model identifier
    #[serde(rename = "CONFIGURATION_ERROR")]
    ConfigurationError,

    // Resources (404)
    /// Dataset, column, or results file does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    // Upstream generation service (502)
    /// Transport failure, timeout, or reply of the wrong shape
    #[serde(rename = "GENERATION_FAILURE")]
    GenerationFailure,

    // Internal (500)
    /// Results file could not be read or written
    #[serde(rename = "STORAGE_ERROR")]
    StorageError,
    /// Anything else
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidHistoryEntry | Self::ConfigurationError => 400,
            Self::ResourceNotFound => 404,
            Self::GenerationFailure => 502,
            Self::StorageError | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidHistoryEntry => {
                "A history entry is neither a role/content turn nor a compressed summary"
            }
            Self::ConfigurationError => "A required call parameter is missing or invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::GenerationFailure => "The generation service failed to produce a valid result",
            Self::StorageError => "Storage operation failed",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether the error was caused by the caller's request
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::InvalidHistoryEntry
                | Self::ConfigurationError
                | Self::ResourceNotFound
        )
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured details (upstream status, offending index, ...)
    pub details: Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Value::Null,
            source: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Malformed conversation turn at `index`
    pub fn invalid_history_entry(index: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::InvalidHistoryEntry,
            format!("history[{index}]: {message}"),
        )
        .with_details(serde_json::json!({ "index": index }))
    }

    /// Missing or blank call parameter
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigurationError, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Upstream generation failure (transport, timeout, or output shape)
    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenerationFailure, message)
    }

    /// Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional structured details
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_client_error() {
            tracing::debug!(code = ?self.code, "Request rejected: {}", self.message);
        } else {
            tracing::error!(code = ?self.code, "Request failed: {}", self.message);
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        Self::invalid_input(format!("CSV error: {error}")).with_source(error)
    }
}

impl From<calamine::XlsxError> for AppError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::invalid_input(format!("XLSX error: {error}")).with_source(error)
    }
}

// ABOUTME: Route module organization for the objective prompter HTTP endpoints
// ABOUTME: Groups health, prompting, and dataset routes and shared body decoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the objective prompter
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the prompting and dataset layers.

/// Dataset upload and results routes
pub mod dataset;
/// Health check and readiness routes
pub mod health;
/// Prompt generation, compression, and evaluation routes
pub mod prompting;

pub use dataset::DatasetRoutes;
pub use health::HealthRoutes;
pub use prompting::PromptingRoutes;

use axum::{extract::rejection::JsonRejection, Json};

use crate::errors::{AppError, AppResult};

/// Unwrap a JSON body, turning axum's rejection into an `InvalidInput` error
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

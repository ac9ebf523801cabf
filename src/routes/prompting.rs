// ABOUTME: HTTP handlers for next-prompt generation, history compression, and evaluation
// ABOUTME: Thin adapters that decode JSON bodies and delegate to the prompting operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::info;

use super::json_body;
use crate::errors::AppError;
use crate::prompting::{
    CompressHistoryRequest, CompressionResponse, EvaluateRequest, EvaluationResponse,
    GeneratePromptRequest, PromptResponse,
};
use crate::server::AppState;

/// Prompting routes implementation
pub struct PromptingRoutes;

impl PromptingRoutes {
    /// Create the prompting routes, relative to the API prefix
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/generate_prompt", post(Self::handle_generate_prompt))
            .route("/compress_history", post(Self::handle_compress_history))
            .route("/evaluate", post(Self::handle_evaluate))
            .with_state(state)
    }

    /// Handle POST /generate_prompt
    async fn handle_generate_prompt(
        State(state): State<Arc<AppState>>,
        body: Result<Json<GeneratePromptRequest>, JsonRejection>,
    ) -> Result<Json<PromptResponse>, AppError> {
        let request = json_body(body)?;
        info!(
            model = %request.model,
            turns = request.history.len(),
            max_turns = request.max_turns,
            "Generating next prompt"
        );

        let response = state.prompting.generator.generate(&request).await?;
        Ok(Json(response))
    }

    /// Handle POST /compress_history
    async fn handle_compress_history(
        State(state): State<Arc<AppState>>,
        body: Result<Json<CompressHistoryRequest>, JsonRejection>,
    ) -> Result<Json<CompressionResponse>, AppError> {
        let request = json_body(body)?;
        info!(turns = request.history.len(), "Compressing history");

        let response = state.prompting.compressor.compress(&request).await?;
        Ok(Json(response))
    }

    /// Handle POST /evaluate
    async fn handle_evaluate(
        State(state): State<Arc<AppState>>,
        body: Result<Json<EvaluateRequest>, JsonRejection>,
    ) -> Result<Json<EvaluationResponse>, AppError> {
        let request = json_body(body)?;
        info!("Evaluating objective");

        let response = state.prompting.evaluator.evaluate(&request).await?;
        Ok(Json(response))
    }
}

// ABOUTME: Binary judgment of whether the latest assistant message meets the objective
// ABOUTME: Uses the pinned default model at temperature 0 and requires {success: boolean}
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::prompts;
use crate::constants::{result_keys, temperatures};
use crate::errors::{AppError, AppResult};
use crate::llm::{GenerationRequest, GenerationService, OutputShape, StructuredResult};

/// Body of `POST /evaluate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Goal the conversation is steered toward
    pub objective: String,
    /// Latest assistant message; earlier turns are not considered
    pub assistant_message: String,
}

/// `{success: boolean}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Whether the objective has likely been met
    pub success: bool,
}

impl TryFrom<StructuredResult> for EvaluationResponse {
    type Error = AppError;

    fn try_from(result: StructuredResult) -> AppResult<Self> {
        result
            .get_bool(result_keys::SUCCESS)
            .map(|success| Self { success })
            .ok_or_else(|| AppError::generation("structured result has no boolean 'success'"))
    }
}

/// Judges one assistant message against an objective
#[derive(Clone)]
pub struct ObjectiveEvaluator {
    service: GenerationService,
}

impl ObjectiveEvaluator {
    /// Create an evaluator over the given service
    #[must_use]
    pub const fn new(service: GenerationService) -> Self {
        Self { service }
    }

    /// Build the generation request without calling the service
    #[must_use]
    pub fn build_request(&self, request: &EvaluateRequest) -> GenerationRequest {
        GenerationRequest {
            model: self.service.default_model().to_owned(),
            temperature: temperatures::OBJECTIVE_EVALUATION,
            system_instruction: prompts::OBJECTIVE_EVALUATION_SYSTEM.to_owned(),
            user_instruction: prompts::objective_evaluation_instruction(
                &request.objective,
                &request.assistant_message,
            ),
            shape: OutputShape::boolean(result_keys::SUCCESS),
        }
    }

    /// Evaluate the latest assistant message
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` for transport, timeout, or output-shape failures.
    #[instrument(skip(self, request), fields(message_len = request.assistant_message.len()))]
    pub async fn evaluate(&self, request: &EvaluateRequest) -> AppResult<EvaluationResponse> {
        let generation = self.build_request(request);

        self.service.invoke(&generation).await?.try_into()
    }
}

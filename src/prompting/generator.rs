// ABOUTME: Next-prompt generation toward a caller-stated objective
// ABOUTME: Renders history, builds the instruction pair, and requires a {response: string} result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::history::{ConversationHistory, RenderStyle};
use super::prompts;
use crate::constants::{result_keys, temperatures};
use crate::errors::{AppError, AppResult};
use crate::llm::{GenerationRequest, GenerationService, OutputShape, StructuredResult};

const fn default_max_turns() -> u32 {
    1
}

/// Body of `POST /generate_prompt`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePromptRequest {
    /// Caller-chosen model identifier; missing and blank are both rejected at call time
    #[serde(default)]
    pub model: String,
    /// Goal the conversation is steered toward
    pub objective: String,
    /// Chronological turns, each `{role, content}` or `{compressed_summary}`
    pub history: Vec<Value>,
    /// Free-form guidance embedded in the instruction
    pub special_notes: String,
    /// Reserved for the caller's session loop; generation is always single-shot
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

/// `{response: string}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    /// The next user prompt
    pub response: String,
}

impl TryFrom<StructuredResult> for PromptResponse {
    type Error = AppError;

    fn try_from(result: StructuredResult) -> AppResult<Self> {
        result
            .get_str(result_keys::RESPONSE)
            .map(|response| Self {
                response: response.to_owned(),
            })
            .ok_or_else(|| AppError::generation("structured result has no string 'response'"))
    }
}

/// Produces the single most effective next user prompt for an objective
#[derive(Clone)]
pub struct PromptGenerator {
    service: GenerationService,
}

impl PromptGenerator {
    /// Create a generator over the given service
    #[must_use]
    pub const fn new(service: GenerationService) -> Self {
        Self { service }
    }

    /// Build the generation request without calling the service
    ///
    /// # Errors
    ///
    /// Returns `InvalidHistoryEntry` if any history entry is malformed.
    pub fn build_request(&self, request: &GeneratePromptRequest) -> AppResult<GenerationRequest> {
        let history = ConversationHistory::from_entries(&request.history)?;
        let rendered = history.render(RenderStyle::Generation);

        Ok(GenerationRequest {
            model: request.model.clone(),
            temperature: temperatures::PROMPT_GENERATION,
            system_instruction: prompts::PROMPT_GENERATION_SYSTEM.to_owned(),
            user_instruction: prompts::prompt_generation_instruction(
                &request.objective,
                &rendered,
                &request.special_notes,
            ),
            shape: OutputShape::string(result_keys::RESPONSE),
        })
    }

    /// Generate the next prompt
    ///
    /// `max_turns` is accepted and logged but never changes the call: one
    /// request at temperature 1, no retry.
    ///
    /// # Errors
    ///
    /// - `InvalidHistoryEntry` for a malformed turn (before any upstream call)
    /// - `ConfigurationError` for a blank model
    /// - `GenerationFailure` for transport, timeout, or output-shape failures
    #[instrument(skip(self, request), fields(
        model = %request.model,
        history_len = request.history.len(),
        max_turns = request.max_turns,
    ))]
    pub async fn generate(&self, request: &GeneratePromptRequest) -> AppResult<PromptResponse> {
        let generation = self.build_request(request)?;
        debug!("Generating next prompt; max_turns is reserved and not consumed");

        self.service.invoke(&generation).await?.try_into()
    }
}

// ABOUTME: History compression into a short summary that can be re-inserted as a turn
// ABOUTME: Uses the pinned default model at temperature 0.5 and requires {compressed_summary: string}
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::history::{ConversationHistory, RenderStyle};
use super::prompts;
use crate::constants::{result_keys, temperatures};
use crate::errors::{AppError, AppResult};
use crate::llm::{GenerationRequest, GenerationService, OutputShape, StructuredResult};

/// Body of `POST /compress_history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressHistoryRequest {
    /// Chronological turns, each `{role, content}` or `{compressed_summary}`
    pub history: Vec<Value>,
}

/// `{compressed_summary: string}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionResponse {
    /// 3-4 short lines summarizing the history
    pub compressed_summary: String,
}

impl TryFrom<StructuredResult> for CompressionResponse {
    type Error = AppError;

    fn try_from(result: StructuredResult) -> AppResult<Self> {
        result
            .get_str(result_keys::COMPRESSED_SUMMARY)
            .map(|summary| Self {
                compressed_summary: summary.to_owned(),
            })
            .ok_or_else(|| {
                AppError::generation("structured result has no string 'compressed_summary'")
            })
    }
}

/// Shrinks a history into a summary for the next generation call
#[derive(Clone)]
pub struct HistoryCompressor {
    service: GenerationService,
}

impl HistoryCompressor {
    /// Create a compressor over the given service
    #[must_use]
    pub const fn new(service: GenerationService) -> Self {
        Self { service }
    }

    /// Build the generation request without calling the service
    #[must_use]
    pub fn build_request(&self, history: &ConversationHistory) -> GenerationRequest {
        GenerationRequest {
            model: self.service.default_model().to_owned(),
            temperature: temperatures::HISTORY_COMPRESSION,
            system_instruction: prompts::HISTORY_COMPRESSION_SYSTEM.to_owned(),
            user_instruction: prompts::history_compression_instruction(
                &history.render(RenderStyle::Compression),
            ),
            shape: OutputShape::string(result_keys::COMPRESSED_SUMMARY),
        }
    }

    /// Compress a history
    ///
    /// # Errors
    ///
    /// - `InvalidHistoryEntry` for a malformed turn (before any upstream call)
    /// - `GenerationFailure` for transport, timeout, or output-shape failures
    #[instrument(skip(self, request), fields(history_len = request.history.len()))]
    pub async fn compress(&self, request: &CompressHistoryRequest) -> AppResult<CompressionResponse> {
        let history = ConversationHistory::from_entries(&request.history)?;
        let generation = self.build_request(&history);

        self.service.invoke(&generation).await?.try_into()
    }
}

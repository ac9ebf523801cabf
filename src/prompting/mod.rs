// ABOUTME: Objective-directed prompting pipeline: generation, compression, and evaluation
// ABOUTME: Three stateless operations sharing the conversation history renderer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompting Pipeline
//!
//! Each operation renders its input, issues exactly one structured call to
//! the generation service, and returns the validated result. No operation
//! calls another, and none retries: retry and termination policy belong to
//! the caller's session loop.
//!
//! ```text
//! AWAITING_PROMPT --generate--> AWAITING_RESPONSE --(caller)--> AWAITING_EVALUATION
//!        ^                                                            |
//!        +------------------- evaluate: success=false ----------------+
//!                              evaluate: success=true  --> TERMINATED
//! ```
//!
//! Compression can run between any two turns to shrink the history passed
//! to the next generation call.

/// History compression
pub mod compressor;
/// Objective evaluation
pub mod evaluator;
/// Next-prompt generation
pub mod generator;
/// Conversation history model and rendering
pub mod history;
/// Instruction templates
pub mod prompts;

pub use compressor::{CompressHistoryRequest, CompressionResponse, HistoryCompressor};
pub use evaluator::{EvaluateRequest, EvaluationResponse, ObjectiveEvaluator};
pub use generator::{GeneratePromptRequest, PromptGenerator, PromptResponse};
pub use history::{ConversationHistory, RenderStyle, Turn};

use crate::llm::GenerationService;

/// The three operations over one shared generation service
#[derive(Clone)]
pub struct PromptingService {
    /// Next-prompt generation
    pub generator: PromptGenerator,
    /// History compression
    pub compressor: HistoryCompressor,
    /// Objective evaluation
    pub evaluator: ObjectiveEvaluator,
}

impl PromptingService {
    /// Build all three operations over `service`
    #[must_use]
    pub fn new(service: &GenerationService) -> Self {
        Self {
            generator: PromptGenerator::new(service.clone()),
            compressor: HistoryCompressor::new(service.clone()),
            evaluator: ObjectiveEvaluator::new(service.clone()),
        }
    }
}

// ABOUTME: Instruction templates for prompt generation, history compression, and evaluation
// ABOUTME: System prompts load from markdown at compile time; user instructions are built per call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Instruction Templates
//!
//! System prompts are loaded at compile time from markdown files for easy
//! maintenance. User instructions embed per-call data and are built here so
//! every operation formats its input the same way.

/// System prompt for next-prompt generation
///
/// Establishes the prompt-engineering role and requires a JSON object with a
/// single `response` key.
pub const PROMPT_GENERATION_SYSTEM: &str = include_str!("prompt_generation.md");

/// System prompt for history compression (3-4 short lines, `compressed_summary` key)
pub const HISTORY_COMPRESSION_SYSTEM: &str = include_str!("history_compression.md");

/// System prompt for objective evaluation (binary judgment, `success` key)
pub const OBJECTIVE_EVALUATION_SYSTEM: &str = include_str!("objective_evaluation.md");

/// User instruction for next-prompt generation
#[must_use]
pub fn prompt_generation_instruction(
    objective: &str,
    rendered_history: &str,
    special_notes: &str,
) -> String {
    format!(
        "Objective:\n{objective}\n\n\
         Conversation History:\n{rendered_history}\n\n\
         Special Notes:\n{special_notes}\n\n\
         Please produce the next user prompt in JSON with {{'response': '...'}}."
    )
}

/// User instruction for history compression
#[must_use]
pub fn history_compression_instruction(rendered_history: &str) -> String {
    format!("Here is the conversation history:\n\n{rendered_history}\n\nSummarize it concisely.")
}

/// User instruction for objective evaluation
#[must_use]
pub fn objective_evaluation_instruction(objective: &str, assistant_message: &str) -> String {
    format!(
        "Objective:\n{objective}\n\n\
         Assistant's last response:\n{assistant_message}\n\n\
         Has the objective likely been met?"
    )
}

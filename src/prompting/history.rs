// ABOUTME: Conversation history model and its deterministic rendering into model input text
// ABOUTME: Parses raw and compressed turns from JSON and fails fast on malformed entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation History
//!
//! The caller owns the history and resubmits it on every call. Each entry is
//! either a raw `{role, content}` turn or a `{compressed_summary}` produced by
//! an earlier compression. Rendering yields one line per turn, joined by
//! `\n`, with no truncation or reordering.
//!
//! Compressed turns render with a different prefix depending on which
//! instruction template consumes the text; see [`RenderStyle`].

use serde::Serialize;
use serde_json::Value;

use crate::constants::result_keys;
use crate::errors::{AppError, AppResult};

/// Where rendered history is going to be embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Next-prompt generation: `[COMPRESSED SUMMARY]: ...`
    Generation,
    /// History compression: `COMPRESSED: ...`
    Compression,
}

impl RenderStyle {
    /// Line prefix for a compressed turn in this style
    #[must_use]
    pub const fn compressed_prefix(&self) -> &'static str {
        match self {
            Self::Generation => "[COMPRESSED SUMMARY]: ",
            Self::Compression => "COMPRESSED: ",
        }
    }
}

/// One unit of conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Turn {
    /// A prior compression result re-inserted into the sequence
    Compressed {
        /// Summary text
        #[serde(rename = "compressed_summary")]
        summary: String,
    },
    /// A role/content message
    Raw {
        /// Caller-supplied role, e.g. `user` or `assistant`
        role: String,
        /// Free text
        content: String,
    },
}

impl Turn {
    /// Raw turn
    #[must_use]
    pub fn raw(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Raw {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Compressed turn
    #[must_use]
    pub fn compressed(summary: impl Into<String>) -> Self {
        Self::Compressed {
            summary: summary.into(),
        }
    }

    /// Parse the entry at `index` of a JSON history array
    ///
    /// A `compressed_summary` key takes precedence over `role`/`content`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHistoryEntry` if the entry matches neither variant.
    pub fn from_entry(index: usize, entry: &Value) -> AppResult<Self> {
        let Value::Object(fields) = entry else {
            return Err(AppError::invalid_history_entry(
                index,
                "entry must be a JSON object",
            ));
        };

        if let Some(summary) = fields.get(result_keys::COMPRESSED_SUMMARY) {
            return summary.as_str().map(Self::compressed).ok_or_else(|| {
                AppError::invalid_history_entry(index, "'compressed_summary' must be a string")
            });
        }

        let text_field = |name: &str| -> AppResult<String> {
            match fields.get(name) {
                Some(Value::String(text)) => Ok(text.clone()),
                Some(_) => Err(AppError::invalid_history_entry(
                    index,
                    format!("'{name}' must be a string"),
                )),
                None => Err(AppError::invalid_history_entry(
                    index,
                    format!("entry has neither 'compressed_summary' nor '{name}'"),
                )),
            }
        };

        Ok(Self::raw(text_field("role")?, text_field("content")?))
    }

    /// Render this turn as a single line
    #[must_use]
    pub fn render(&self, style: RenderStyle) -> String {
        match self {
            Self::Compressed { summary } => format!("{}{summary}", style.compressed_prefix()),
            Self::Raw { role, content } => format!("{}: {content}", role.to_uppercase()),
        }
    }
}

/// Ordered, caller-owned sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    /// Wrap already-typed turns
    #[must_use]
    pub const fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    /// Parse a JSON history array, failing on the first malformed entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidHistoryEntry` naming the zero-based index of the bad entry.
    pub fn from_entries(entries: &[Value]) -> AppResult<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Turn::from_entry(index, entry))
            .collect::<AppResult<Vec<_>>>()
            .map(Self::new)
    }

    /// Turns in chronological order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history has no turns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render to one line per turn joined by `\n`; empty history renders to `""`
    #[must_use]
    pub fn render(&self, style: RenderStyle) -> String {
        self.turns
            .iter()
            .map(|turn| turn.render(style))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Turn>> for ConversationHistory {
    fn from(turns: Vec<Turn>) -> Self {
        Self::new(turns)
    }
}

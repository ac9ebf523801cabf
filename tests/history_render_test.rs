// ABOUTME: Property-style tests for conversation history parsing and rendering
// ABOUTME: Checks line counts, prefixes, ordering, and fail-fast parsing over generated histories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use objective_prompter::errors::ErrorCode;
use objective_prompter::prompting::{ConversationHistory, RenderStyle, Turn};
use serde_json::{json, Value};

const ROLES: [&str; 4] = ["user", "assistant", "System", "tool"];

/// Deterministic mixed history of `len` entries; every third is compressed
fn generated_entries(len: usize) -> Vec<Value> {
    (0..len)
        .map(|i| {
            if i % 3 == 2 {
                json!({"compressed_summary": format!("summary {i}")})
            } else {
                json!({"role": ROLES[i % ROLES.len()], "content": format!("message {i}")})
            }
        })
        .collect()
}

#[test]
fn test_raw_only_history_has_one_line_per_turn() {
    for len in 1..12 {
        let entries: Vec<Value> = (0..len)
            .map(|i| json!({"role": ROLES[i % ROLES.len()], "content": format!("m{i}")}))
            .collect();
        let rendered = ConversationHistory::from_entries(&entries)
            .unwrap()
            .render(RenderStyle::Generation);
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines.len(), len);
        for (i, line) in lines.iter().enumerate() {
            let prefix = format!("{}: ", ROLES[i % ROLES.len()].to_uppercase());
            assert!(line.starts_with(&prefix), "line {i}: {line}");
        }
    }
}

#[test]
fn test_compressed_turn_prefix_depends_on_style() {
    let entries = generated_entries(9);
    let history = ConversationHistory::from_entries(&entries).unwrap();

    let generation = history.render(RenderStyle::Generation);
    let compression = history.render(RenderStyle::Compression);

    for (i, (gen_line, comp_line)) in generation.split('\n').zip(compression.split('\n')).enumerate() {
        if i % 3 == 2 {
            assert_eq!(gen_line, format!("[COMPRESSED SUMMARY]: summary {i}"));
            assert_eq!(comp_line, format!("COMPRESSED: summary {i}"));
        } else {
            assert_eq!(gen_line, comp_line);
        }
    }
}

#[test]
fn test_empty_history_renders_to_empty_string() {
    let history = ConversationHistory::from_entries(&[]).unwrap();
    assert!(history.is_empty());
    assert_eq!(history.render(RenderStyle::Generation), "");
}

#[test]
fn test_user_turn_then_summary_renders_in_order() {
    let history = ConversationHistory::from_entries(&[
        json!({"role": "user", "content": "hi"}),
        json!({"compressed_summary": "discussed greeting"}),
    ])
    .unwrap();

    assert_eq!(
        history.render(RenderStyle::Generation),
        "USER: hi\n[COMPRESSED SUMMARY]: discussed greeting"
    );
}

#[test]
fn test_multiline_content_is_not_rewritten() {
    let history = ConversationHistory::new(vec![Turn::raw("assistant", "line one\nline two")]);
    assert_eq!(
        history.render(RenderStyle::Generation),
        "ASSISTANT: line one\nline two"
    );
}

#[test]
fn test_first_malformed_entry_is_reported() {
    let mut entries = generated_entries(6);
    entries[4] = json!({"speaker": "user", "text": "wrong keys"});
    entries[5] = json!(42);

    let error = ConversationHistory::from_entries(&entries).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidHistoryEntry);
    assert_eq!(error.details["index"], 4);
    assert!(error.message.starts_with("history[4]"));
}

// ABOUTME: Dataset side-concern: uploaded tables per session and persisted result rows
// ABOUTME: Feeds seed inputs into the prompting loop and records {prompt, response} pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Results CSV files
pub mod results;
/// Per-session table registry
pub mod store;
/// CSV and XLSX table parsing
pub mod table;

pub use results::{ClearOutcome, ResultsFile, ResultsStore};
pub use store::DatasetStore;
pub use table::{DatasetFormat, DatasetTable};

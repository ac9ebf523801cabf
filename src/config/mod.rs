// ABOUTME: Configuration module root
// ABOUTME: Re-exports environment-driven server, generation, and dataset settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable parsing
pub mod environment;

pub use environment::{DatasetConfig, LlmConfig, ServerConfig};

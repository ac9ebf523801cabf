// ABOUTME: HTTP middleware for the prompter router
// ABOUTME: Provides cross-origin configuration applied to every route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cross-origin configuration
pub mod cors;

// CORS configuration
pub use cors::setup_cors;

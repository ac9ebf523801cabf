// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Allows browser extensions and web clients from any origin to call the prompter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::{header::HeaderName, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::constants::routes;

/// Configure CORS for the prompter API
///
/// Any origin is accepted. The session header is allowed so browser clients
/// can scope their datasets.
pub fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("access-control-request-method"),
            HeaderName::from_static("access-control-request-headers"),
            HeaderName::from_static(routes::SESSION_HEADER),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .expose_headers([HeaderName::from_static("content-disposition")])
}

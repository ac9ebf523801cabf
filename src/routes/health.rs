// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness is unconditional; readiness probes the generation provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use crate::constants::service_names;
use crate::server::AppState;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(state: Arc<AppState>) -> axum::Router {
        use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "service": service_names::OBJECTIVE_PROMPTER,
                "version": service_names::SERVICE_VERSION,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn ready_handler(
            State(state): State<Arc<AppState>>,
        ) -> (StatusCode, Json<serde_json::Value>) {
            let provider = state.generation.provider();
            let (reachable, error) = match provider.health_check().await {
                Ok(reachable) => (reachable, None),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), "Readiness check failed: {}", e);
                    (false, Some(e.message))
                }
            };

            let (status, label) = if reachable {
                (StatusCode::OK, "ready")
            } else {
                (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
            };

            (
                status,
                Json(serde_json::json!({
                    "status": label,
                    "generation_service": {
                        "provider": provider.name(),
                        "reachable": reachable,
                        "error": error,
                    },
                    "timestamp": chrono::Utc::now().to_rfc3339()
                })),
            )
        }

        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .with_state(state)
    }
}

// ABOUTME: Application state, router assembly, and the HTTP server loop
// ABOUTME: Wires prompting and dataset routes under the API prefix with tracing, CORS, and body limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # HTTP Server
//!
//! [`AppState`] is built once at startup and shared by every handler. The
//! prompting operations hold no mutable state; the dataset stores carry
//! their own synchronization.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::constants::routes;
use crate::dataset::{DatasetStore, ResultsStore};
use crate::llm::{
    GenerationService, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider,
};
use crate::middleware::setup_cors;
use crate::prompting::PromptingService;
use crate::routes::{DatasetRoutes, HealthRoutes, PromptingRoutes};

/// Shared state handed to every handler
pub struct AppState {
    /// Structured calls to the generation provider
    pub generation: GenerationService,
    /// Generation, compression, and evaluation
    pub prompting: PromptingService,
    /// Uploaded tables per session
    pub datasets: DatasetStore,
    /// Results CSV files
    pub results: ResultsStore,
    /// Upload body limit in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build state over an explicit provider
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &ServerConfig) -> Self {
        let service = GenerationService::new(provider);
        Self {
            prompting: PromptingService::new(&service),
            generation: service,
            datasets: DatasetStore::new(),
            results: ResultsStore::new(config.datasets.results_dir.clone()),
            max_upload_bytes: config.datasets.max_upload_bytes,
        }
    }

    /// Build state with the OpenAI-compatible provider described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let provider =
            OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from_llm_config(&config.llm))?;
        if config.llm.api_key.is_none() {
            warn!("No generation API key configured; hosted endpoints will reject requests");
        }
        Ok(Self::new(Arc::new(provider), config))
    }
}

/// Assemble the full router
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    let api = Router::new()
        .merge(PromptingRoutes::routes(Arc::clone(&state)))
        .merge(DatasetRoutes::routes(Arc::clone(&state)));

    Router::new()
        .merge(HealthRoutes::routes(state))
        .nest(routes::API_PREFIX, api)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors())
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let address = format!("{}:{}", config.host, config.http_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    info!("Listening on http://{}", address);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated with an error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

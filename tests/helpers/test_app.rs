// ABOUTME: Builders for application state and routers backed by a scripted provider
// ABOUTME: Points the results store at a caller-owned temporary directory

use std::path::Path;
use std::sync::Arc;

use objective_prompter::config::ServerConfig;
use objective_prompter::server::{build_router, AppState};

use super::scripted_provider::ScriptedProvider;

/// Application state over `provider`, storing results under `results_dir`
pub fn test_state(provider: Arc<ScriptedProvider>, results_dir: &Path) -> Arc<AppState> {
    let mut config = ServerConfig::default();
    config.datasets.results_dir = results_dir.to_path_buf();
    Arc::new(AppState::new(provider, &config))
}

/// Full router over `provider`
pub fn test_router(provider: Arc<ScriptedProvider>, results_dir: &Path) -> axum::Router {
    build_router(test_state(provider, results_dir))
}

// ABOUTME: Server binary for the objective-directed prompting service
// ABOUTME: Loads environment configuration, initializes logging, and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Objective Prompter Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use objective_prompter::{
    config::environment::ServerConfig, constants::routes, logging, server,
};
use tracing::{error, info};

/// Command-line overrides for the environment configuration
#[derive(Parser)]
#[command(name = "objective-prompter")]
#[command(about = "Objective-directed prompt generation, history compression, and evaluation")]
pub struct Args {
    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging settings may come from .env
    dotenvy::dotenv().ok();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Objective Prompter");
    info!("{}", config.summary());

    let state = Arc::new(server::AppState::from_config(&config)?);

    display_available_endpoints(&config);

    if let Err(e) = server::serve(&config, state).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints
fn display_available_endpoints(config: &ServerConfig) {
    let base = format!("http://{}:{}", config.host, config.http_port);
    let api = format!("{base}{}", routes::API_PREFIX);

    info!("=== Available API Endpoints ===");
    info!("Health:");
    info!("  GET  {base}/health");
    info!("  GET  {base}/ready");
    info!("Prompting:");
    info!("  POST {api}/generate_prompt");
    info!("  POST {api}/compress_history");
    info!("  POST {api}/evaluate");
    info!("Datasets (scoped by the {} header):", routes::SESSION_HEADER);
    info!("  POST {api}/upload_dataset");
    info!("  POST {api}/get_dataset_rows");
    info!("  POST {api}/save_dataset_result");
    info!("  GET  {api}/download_dataset_results");
    info!("  POST {api}/clear_dataset_results");
    info!("=== End of Endpoint List ===");
}

//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixelforge_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Telemetry first, so validation warnings reach the subscriber
    pixelforge_infra::init_telemetry("pixelforge-api", config.environment(), config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    let warnings =
        validation::validate_config(&config).context("Configuration validation failed")?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!("Configuration loaded and validated successfully");

    let segmenter = pixelforge_services::build_segmenter(&config)?;
    let state = Arc::new(AppState::new(config.clone(), segmenter));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

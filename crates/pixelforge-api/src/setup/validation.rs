//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use pixelforge_core::Config;

/// Validate critical configuration values
///
/// Hard errors fail startup. Soft problems come back as warnings for the caller
/// to log once telemetry is up.
pub fn validate_config(config: &Config) -> Result<Vec<&'static str>> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    let mut warnings = Vec::new();
    if config.segmentation_url().is_none() {
        warnings.push("SEGMENTATION_URL is not set - background removal is disabled");
        if config.segmentation_api_key().is_some() {
            warnings
                .push("SEGMENTATION_API_KEY is set without SEGMENTATION_URL and will be ignored");
        }
    }

    Ok(warnings)
}

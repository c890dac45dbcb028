//! Segmentation backends

mod remote;
mod unconfigured;

pub use remote::RemoteSegmenter;
pub use unconfigured::UnconfiguredSegmenter;

use std::sync::Arc;
use std::time::Duration;

use pixelforge_core::Config;
use pixelforge_processing::Segmenter;

/// Pick the segmentation backend described by the configuration
pub fn build_segmenter(config: &Config) -> anyhow::Result<Arc<dyn Segmenter>> {
    match config.segmentation_url() {
        Some(url) => {
            let segmenter = RemoteSegmenter::new(
                url,
                config.segmentation_api_key().map(str::to_string),
                config.segmentation_timeout_secs().map(Duration::from_secs),
            )?;
            tracing::info!(url = %url, "Using remote segmentation backend");
            Ok(Arc::new(segmenter))
        }
        None => {
            tracing::warn!(
                "SEGMENTATION_URL not set; background removal requests will fail"
            );
            Ok(Arc::new(UnconfiguredSegmenter))
        }
    }
}

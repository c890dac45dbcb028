use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

/// Output requested from the segmentation backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationConfig {
    /// Must carry an alpha channel
    pub output_format: String,
    /// 0.0..=1.0
    pub output_quality: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            output_format: "image/png".to_string(),
            output_quality: 1.0,
        }
    }
}

/// External foreground segmentation capability.
///
/// Implementations return an encoded image whose alpha channel separates the
/// foreground from the background. Any error is reported to callers as a
/// segmentation failure; the pipeline never retries.
#[async_trait]
pub trait Segmenter: Send + Sync {
    async fn segment(&self, image: Bytes, config: &SegmentationConfig) -> anyhow::Result<Bytes>;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}

use async_trait::async_trait;
use bytes::Bytes;
use pixelforge_processing::{SegmentationConfig, Segmenter};

/// Stand-in used when no segmentation backend is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSegmenter;

#[async_trait]
impl Segmenter for UnconfiguredSegmenter {
    async fn segment(&self, _image: Bytes, _config: &SegmentationConfig) -> anyhow::Result<Bytes> {
        Err(anyhow::anyhow!("segmentation backend is not configured"))
    }

    fn name(&self) -> &'static str {
        "unconfigured"
    }
}

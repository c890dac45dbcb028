//! Deterministic in-process segmentation backends

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use pixelforge_services::{SegmentationConfig, Segmenter};

/// Marks the left half as background and the right half as foreground
#[derive(Default)]
pub struct HalfCutoutSegmenter {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Segmenter for HalfCutoutSegmenter {
    async fn segment(&self, input: Bytes, _config: &SegmentationConfig) -> anyhow::Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut rgba = image::load_from_memory(&input)?.to_rgba8();
        let width = rgba.width();
        for (x, _, pixel) in rgba.enumerate_pixels_mut() {
            pixel[3] = if x < width / 2 { 0 } else { 255 };
        }

        let mut out = Vec::new();
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)?;
        Ok(Bytes::from(out))
    }

    fn name(&self) -> &'static str {
        "half-cutout"
    }
}

/// Always fails like an unreachable model server
pub struct FailingSegmenter;

#[async_trait]
impl Segmenter for FailingSegmenter {
    async fn segment(&self, _input: Bytes, _config: &SegmentationConfig) -> anyhow::Result<Bytes> {
        Err(anyhow::anyhow!("model server unreachable"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Reports success but returns no bytes
pub struct EmptySegmenter;

#[async_trait]
impl Segmenter for EmptySegmenter {
    async fn segment(&self, _input: Bytes, _config: &SegmentationConfig) -> anyhow::Result<Bytes> {
        Ok(Bytes::new())
    }

    fn name(&self) -> &'static str {
        "empty"
    }
}

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use image::DynamicImage;

use super::alpha::{self, REFINEMENT_CHAIN};
use super::gate::AdmissionGate;
use super::preprocess::preprocess;
use super::segmenter::{SegmentationConfig, Segmenter};
use crate::error::ProcessingError;
use crate::image::{decode, encode_png};

/// Stages a removal passes through, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Admission,
    Preprocessing,
    Segmenting,
    Postprocessing,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Admission => "admission",
            PipelineStage::Preprocessing => "preprocessing",
            PipelineStage::Segmenting => "segmenting",
            PipelineStage::Postprocessing => "postprocessing",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Admission-controlled background removal over an injected segmenter
#[derive(Clone)]
pub struct BackgroundRemovalPipeline {
    gate: Arc<AdmissionGate>,
    segmenter: Arc<dyn Segmenter>,
    config: SegmentationConfig,
}

impl BackgroundRemovalPipeline {
    pub fn new(gate: Arc<AdmissionGate>, segmenter: Arc<dyn Segmenter>) -> Self {
        Self {
            gate,
            segmenter,
            config: SegmentationConfig::default(),
        }
    }

    pub fn gate(&self) -> &Arc<AdmissionGate> {
        &self.gate
    }

    /// Remove the background of `input`, returning a PNG with alpha.
    ///
    /// Fails fast with [`ProcessingError::Busy`] when the gate is full. Once
    /// admitted, the slot is held by a permit and released on every exit path.
    #[tracing::instrument(
        skip_all,
        fields(input_bytes = input.len(), segmenter = self.segmenter.name())
    )]
    pub async fn remove_background(&self, input: Bytes) -> Result<Bytes, ProcessingError> {
        let _permit = match self.gate.try_acquire() {
            Some(permit) => permit,
            None => {
                tracing::warn!(
                    active = self.gate.active_count(),
                    capacity = self.gate.capacity(),
                    "Background removal rejected, gate is full"
                );
                return Err(ProcessingError::Busy);
            }
        };
        tracing::debug!(
            stage = %PipelineStage::Admission,
            active = self.gate.active_count(),
            "Admitted"
        );

        if input.is_empty() {
            return Err(ProcessingError::EmptyInput);
        }

        tracing::debug!(stage = %PipelineStage::Preprocessing, "Starting stage");
        let prepared = run_blocking(move || preprocess(&input)).await?;

        tracing::debug!(
            stage = %PipelineStage::Segmenting,
            prepared_bytes = prepared.len(),
            "Starting stage"
        );
        let segmented = self
            .segmenter
            .segment(Bytes::from(prepared), &self.config)
            .await
            .map_err(|e| ProcessingError::Segmentation(format!("{:#}", e)))?;

        tracing::debug!(
            stage = %PipelineStage::Postprocessing,
            segmented_bytes = segmented.len(),
            "Starting stage"
        );
        let output = run_blocking(move || refine_segmentation(&segmented)).await?;

        tracing::debug!(
            stage = %PipelineStage::Done,
            output_bytes = output.len(),
            "Background removed"
        );
        Ok(Bytes::from(output))
    }
}

/// Refine the alpha mask of a segmentation result and re-encode it
pub fn refine_segmentation(segmented: &[u8]) -> Result<Vec<u8>, ProcessingError> {
    if segmented.is_empty() {
        return Err(ProcessingError::Processing(
            "segmentation returned no image data".to_string(),
        ));
    }
    let rgba = decode(segmented)?.to_rgba8();
    let mask = alpha::refine(alpha::extract_alpha(&rgba), &REFINEMENT_CHAIN);
    let combined = alpha::recombine(&rgba, &mask);
    encode_png(&DynamicImage::ImageRgba8(combined))
}

async fn run_blocking<T, F>(work: F) -> Result<T, ProcessingError>
where
    F: FnOnce() -> Result<T, ProcessingError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ProcessingError::Processing(format!("Image worker failed: {}", e)))?
}

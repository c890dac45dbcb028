//! Background removal
//!
//! Admission-controlled pipeline: preprocess, hand off to an external
//! [`Segmenter`], then refine the returned alpha mask with a fixed chain.

pub mod alpha;
pub mod gate;
pub mod pipeline;
pub mod preprocess;
pub mod segmenter;

pub use alpha::{AlphaStep, REFINEMENT_CHAIN};
pub use gate::{AdmissionGate, AdmissionPermit};
pub use pipeline::{BackgroundRemovalPipeline, PipelineStage};
pub use segmenter::{SegmentationConfig, Segmenter};

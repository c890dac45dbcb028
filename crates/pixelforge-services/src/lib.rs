//! Pixelforge Services Layer
//!
//! Concrete collaborators for the processing pipeline (segmentation backends)
//! plus a facade re-exporting the processing API, so the API crate depends on
//! a single service crate.

pub mod segmentation;

pub use pixelforge_processing::naming;
pub use pixelforge_processing::{
    ensure_supported, resolve_quality, AdmissionGate, AdmissionPermit, BackgroundRemovalPipeline,
    CompressOptions, CompressionEngine, ConversionEngine, DuplicationPackager, OutputFormat,
    ProcessingError, QualityPreset, SegmentationConfig, Segmenter,
};
pub use segmentation::{build_segmenter, RemoteSegmenter, UnconfiguredSegmenter};

//! Pixelforge image transformation pipeline
//!
//! Stateless transforms (compression, canonical conversion, duplication) plus
//! the admission-controlled background-removal pipeline.

pub mod background;
pub mod compression;
pub mod conversion;
pub mod duplication;
pub mod error;
pub mod image;
pub mod naming;
pub mod quality;
pub mod validator;

pub use background::{
    AdmissionGate, AdmissionPermit, AlphaStep, BackgroundRemovalPipeline, SegmentationConfig,
    Segmenter,
};
pub use compression::{CompressOptions, CompressionEngine, OutputFormat};
pub use conversion::ConversionEngine;
pub use duplication::DuplicationPackager;
pub use error::ProcessingError;
pub use quality::{resolve_quality, QualityPreset};
pub use validator::{ensure_supported, SUPPORTED_MIME_TYPES};

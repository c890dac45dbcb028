use pixelforge_core::{ProcessedImage, RawImageInput};

use crate::error::ProcessingError;
use crate::image::{decode_upright, encode_png};
use crate::naming;
use crate::validator;

/// Canonical lossless output format
pub const CANONICAL_MIME: &str = "image/png";
pub const CANONICAL_EXTENSION: &str = "png";

/// Re-encode uploads into the canonical lossless format
pub struct ConversionEngine;

impl ConversionEngine {
    /// Orient and re-encode as PNG, preserving transparency and full bit depth
    #[tracing::instrument(
        skip(input),
        fields(filename = %input.filename, mime = %input.declared_mime)
    )]
    pub fn to_canonical(input: &RawImageInput) -> Result<ProcessedImage, ProcessingError> {
        validator::ensure_supported(&input.declared_mime)?;

        let img = decode_upright(&input.bytes)?;
        let encoded = encode_png(&img)?;
        let name = naming::with_extension(&input.filename, CANONICAL_EXTENSION);

        tracing::debug!(
            output = %name,
            has_alpha = img.color().has_alpha(),
            output_bytes = encoded.len(),
            "Image converted"
        );

        Ok(ProcessedImage::new(name, CANONICAL_MIME, encoded))
    }
}

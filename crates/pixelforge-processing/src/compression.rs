use std::str::FromStr;

use image::DynamicImage;
use pixelforge_core::{ProcessedImage, RawImageInput};
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;
use crate::image::{decode_upright, encode_png, ImageResize, ResizeBounds};
use crate::naming;
use crate::quality::{resolve_quality, QualityPreset};
use crate::validator;

/// WebP encoder effort (0 fastest .. 6 slowest, smallest)
const WEBP_METHOD: i32 = 6;

/// Output format for compressed images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    #[serde(rename = "webp")]
    WebP,
    Png,
}

impl OutputFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Png => "png",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::WebP => "webp",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            "png" => Ok(OutputFormat::Png),
            other => Err(ProcessingError::InvalidOption(format!(
                "Invalid format: {} (expected jpeg, webp or png)",
                other
            ))),
        }
    }
}

/// Options for a single compression request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompressOptions {
    /// Takes precedence over `preset` when finite
    pub explicit_quality: Option<f64>,
    pub preset: Option<QualityPreset>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub target_format: OutputFormat,
}

impl CompressOptions {
    pub fn quality(&self) -> u8 {
        resolve_quality(self.preset, self.explicit_quality)
    }

    pub fn bounds(&self) -> ResizeBounds {
        ResizeBounds::new(self.max_width, self.max_height)
    }

    fn validate(&self) -> Result<(), ProcessingError> {
        if self.max_width == Some(0) || self.max_height == Some(0) {
            return Err(ProcessingError::InvalidOption(
                "maxWidth and maxHeight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resize and re-encode uploads into a target raster format
pub struct CompressionEngine;

impl CompressionEngine {
    /// Validate, orient, fit inside the requested box and re-encode.
    ///
    /// Metadata is not carried over; orientation is baked into the pixels first.
    #[tracing::instrument(
        skip(input),
        fields(
            filename = %input.filename,
            mime = %input.declared_mime,
            input_bytes = input.bytes.len()
        )
    )]
    pub fn compress(
        input: &RawImageInput,
        options: &CompressOptions,
    ) -> Result<ProcessedImage, ProcessingError> {
        validator::ensure_supported(&input.declared_mime)?;
        options.validate()?;

        let quality = options.quality();
        let img = decode_upright(&input.bytes)?;
        let img = ImageResize::resize_to_fit(img, options.bounds());

        let encoded = match options.target_format {
            OutputFormat::Jpeg => Self::encode_jpeg(&img, quality)?,
            OutputFormat::WebP => Self::encode_webp(&img, quality)?,
            OutputFormat::Png => encode_png(&img)?,
        };

        let name = naming::with_extension(&input.filename, options.target_format.extension());

        tracing::debug!(
            output = %name,
            quality = quality,
            width = img.width(),
            height = img.height(),
            output_bytes = encoded.len(),
            "Image compressed"
        );

        Ok(ProcessedImage::new(
            name,
            options.target_format.to_mime_type(),
            encoded,
        ))
    }

    /// JPEG via mozjpeg: progressive, optimized Huffman tables, 4:4:4 chroma.
    /// Trellis quantization is part of mozjpeg's default profile.
    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_chroma_sampling_pixel_sizes((1, 1), (1, 1));
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }

    /// WebP at maximum method effort, keeping alpha only when the source has it
    fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let mut config = webp::WebPConfig::new().map_err(|_| {
            ProcessingError::Processing("Failed to initialise WebP encoder config".to_string())
        })?;
        config.quality = quality as f32;
        config.method = WEBP_METHOD;

        let (width, height) = (img.width(), img.height());
        let encoded = if img.color().has_alpha() {
            let rgba_img = img.to_rgba8();
            webp::Encoder::from_rgba(&rgba_img, width, height).encode_advanced(&config)
        } else {
            let rgb_img = img.to_rgb8();
            webp::Encoder::from_rgb(&rgb_img, width, height).encode_advanced(&config)
        };

        let memory = encoded.map_err(|e| {
            ProcessingError::Processing(format!("WebP encoding failed: {:?}", e))
        })?;
        Ok(memory.to_vec())
    }
}

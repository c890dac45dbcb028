//! Segmentation input preparation

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::error::ProcessingError;
use crate::image::{decode, encode_png, ImageResize, ResizeBounds};

/// Fraction of pixels clipped at each end of the luminance histogram
const NORMALIZE_CLIP: f64 = 0.01;

/// Decode, bound to the original size, stretch contrast and re-encode as PNG
pub fn preprocess(data: &[u8]) -> Result<Vec<u8>, ProcessingError> {
    let img = decode(data)?;
    let (width, height) = img.dimensions();

    // Bounding to the source size keeps the pixel grid and never upsamples
    let img = ImageResize::resize_to_fit(img, ResizeBounds::new(Some(width), Some(height)));
    let normalized = normalize_contrast(&img);

    tracing::debug!(width = width, height = height, "Preprocessed segmentation input");

    encode_png(&DynamicImage::ImageRgba8(normalized))
}

/// Rec. 709 luma of an 8-bit pixel
fn luma(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    (0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32).round() as u8
}

/// Luminance values at the low and high clip percentiles
fn luma_bounds(image: &RgbaImage) -> Option<(u8, u8)> {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[luma(pixel) as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return None;
    }

    let clip = (total as f64 * NORMALIZE_CLIP).floor() as u64;
    let low = first_past(clip, histogram.iter().copied().enumerate());
    let high = first_past(clip, histogram.iter().copied().enumerate().rev());
    Some((low, high))
}

/// First histogram bin at which the running count exceeds `skip`
fn first_past(skip: u64, bins: impl Iterator<Item = (usize, u64)>) -> u8 {
    let mut seen = 0u64;
    for (value, count) in bins {
        seen += count;
        if seen > skip {
            return value as u8;
        }
    }
    0
}

/// Linear stretch mapping the 1st..99th luminance percentiles to the full range.
///
/// Flat images are returned unchanged. Alpha is untouched.
pub fn normalize_contrast(img: &DynamicImage) -> RgbaImage {
    let mut rgba = img.to_rgba8();
    let (low, high) = match luma_bounds(&rgba) {
        Some((low, high)) if high > low => (low as f32, high as f32),
        _ => return rgba,
    };

    let scale = 255.0 / (high - low);
    for pixel in rgba.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            *channel = ((*channel as f32 - low) * scale).round().clamp(0.0, 255.0) as u8;
        }
    }
    rgba
}

//! Alpha mask refinement
//!
//! The mask returned by segmentation is sharpened, cleaned of faint residue
//! and softened, in that order. Each step is a named value so the chain is
//! inspectable and its order testable.

use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};

pub const ALPHA_GAIN: f32 = 1.2;
pub const ALPHA_BIAS: f32 = -25.0;
pub const ALPHA_THRESHOLD: u8 = 15;
pub const ALPHA_BLUR_SIGMA: f32 = 0.5;

/// One deterministic transform over an 8-bit alpha mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaStep {
    /// `alpha * gain + bias`, rounded and clamped to 0..=255
    Linear { gain: f32, bias: f32 },
    /// Zero every value at or below the cutoff
    Threshold(u8),
    /// Gaussian blur with the given sigma
    Blur(f32),
}

/// Fixed refinement order
pub const REFINEMENT_CHAIN: [AlphaStep; 3] = [
    AlphaStep::Linear {
        gain: ALPHA_GAIN,
        bias: ALPHA_BIAS,
    },
    AlphaStep::Threshold(ALPHA_THRESHOLD),
    AlphaStep::Blur(ALPHA_BLUR_SIGMA),
];

impl AlphaStep {
    pub fn name(&self) -> &'static str {
        match self {
            AlphaStep::Linear { .. } => "linear",
            AlphaStep::Threshold(_) => "threshold",
            AlphaStep::Blur(_) => "blur",
        }
    }

    pub fn apply(&self, mut mask: GrayImage) -> GrayImage {
        match *self {
            AlphaStep::Linear { gain, bias } => {
                for Luma([value]) in mask.pixels_mut() {
                    *value = (*value as f32 * gain + bias).round().clamp(0.0, 255.0) as u8;
                }
                mask
            }
            AlphaStep::Threshold(cutoff) => {
                for Luma([value]) in mask.pixels_mut() {
                    if *value <= cutoff {
                        *value = 0;
                    }
                }
                mask
            }
            AlphaStep::Blur(sigma) if sigma > 0.0 => imageops::blur(&mask, sigma),
            AlphaStep::Blur(_) => mask,
        }
    }
}

/// Run the mask through every step of `chain` in order
pub fn refine(mask: GrayImage, chain: &[AlphaStep]) -> GrayImage {
    chain.iter().fold(mask, |mask, step| {
        tracing::trace!(step = step.name(), "Applying alpha step");
        step.apply(mask)
    })
}

pub fn extract_alpha(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[3]])
    })
}

/// Colour channels of `image` with `mask` as the new alpha
pub fn recombine(image: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, _]) = *image.get_pixel(x, y);
        Rgba([r, g, b, mask.get_pixel(x, y)[0]])
    })
}

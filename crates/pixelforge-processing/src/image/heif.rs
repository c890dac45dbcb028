//! HEIC/HEIF decoding through libheif

use image::{DynamicImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use crate::error::ProcessingError;

/// Decode the primary image of a HEIF container to RGBA8
pub fn decode_heif(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    let failed = |e: libheif_rs::HeifError| {
        ProcessingError::Processing(format!("HEIF decoding failed: {}", e))
    };

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data).map_err(failed)?;
    let handle = ctx.primary_image_handle().map_err(failed)?;
    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgba), None)
        .map_err(failed)?;

    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or_else(|| {
        ProcessingError::Processing("HEIF image has no interleaved RGBA plane".to_string())
    })?;

    // Rows may be padded past width * 4
    let row_bytes = plane.width as usize * 4;
    let mut pixels = Vec::with_capacity(row_bytes * plane.height as usize);
    for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
        let row = row.get(..row_bytes).ok_or_else(|| {
            ProcessingError::Processing("HEIF row is shorter than the image width".to_string())
        })?;
        pixels.extend_from_slice(row);
    }

    RgbaImage::from_raw(plane.width, plane.height, pixels)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| {
            ProcessingError::Processing("HEIF plane does not match its dimensions".to_string())
        })
}

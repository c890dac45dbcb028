//! Shared image primitives: decoding, orientation, resizing and PNG encoding

pub mod avif;
#[cfg(feature = "heif")]
pub mod heif;
pub mod orientation;
pub mod resize;

pub use orientation::ImageOrientation;
pub use resize::{ImageResize, ResizeBounds};

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, ImageReader};

use crate::error::ProcessingError;

/// ISO-BMFF image containers the `image` crate cannot decode itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoContainer {
    Avif,
    Heif,
}

const AVIF_BRANDS: [&[u8; 4]; 2] = [b"avif", b"avis"];
const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"mif1", b"msf1",
];

/// Classify an `ftyp` box by its major and compatible brands. AVIF wins over
/// the generic `mif1` brand that both families carry.
pub fn sniff_iso_container(data: &[u8]) -> Option<IsoContainer> {
    if data.len() < 16 || &data[4..8] != b"ftyp" {
        return None;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let end = box_size.clamp(16, data.len());

    let compatible = data[16..end].chunks_exact(4);
    let brands: Vec<&[u8]> = std::iter::once(&data[8..12]).chain(compatible).collect();

    if brands.iter().any(|b| AVIF_BRANDS.iter().any(|a| &a[..] == *b)) {
        Some(IsoContainer::Avif)
    } else if brands.iter().any(|b| HEIF_BRANDS.iter().any(|h| &h[..] == *b)) {
        Some(IsoContainer::Heif)
    } else {
        None
    }
}

#[cfg(feature = "heif")]
fn decode_heif(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    heif::decode_heif(data)
}

#[cfg(not(feature = "heif"))]
fn decode_heif(_data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    Err(ProcessingError::Processing(
        "HEIC/HEIF decoding is not enabled in this build (cargo feature `heif`)".to_string(),
    ))
}

/// Decode an image, sniffing the container from its bytes rather than the declared type
pub fn decode(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    if data.is_empty() {
        return Err(ProcessingError::EmptyInput);
    }

    match sniff_iso_container(data) {
        Some(IsoContainer::Avif) => return log_decoded("avif", avif::decode_avif(data)?),
        Some(IsoContainer::Heif) => return log_decoded("heif", decode_heif(data)?),
        None => {}
    }

    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let format = reader
        .format()
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("unknown");
    let img = reader.decode()?;
    log_decoded(format, img)
}

fn log_decoded(format: &str, img: DynamicImage) -> Result<DynamicImage, ProcessingError> {
    tracing::debug!(
        format = format,
        width = img.width(),
        height = img.height(),
        "Decoded image"
    );
    Ok(img)
}

/// Decode and apply the EXIF orientation, so pixels are upright and metadata can be dropped
pub fn decode_upright(data: &[u8]) -> Result<DynamicImage, ProcessingError> {
    let img = decode(data)?;
    Ok(ImageOrientation::apply_exif_orientation(img, data))
}

/// Encode as PNG with maximum zlib effort and adaptive row filtering.
///
/// Floating point buffers are widened to 16-bit RGBA since PNG has no float samples.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
    let widened;
    let img = match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            widened = DynamicImage::ImageRgba16(img.to_rgba16());
            &widened
        }
        _ => img,
    };

    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilterType::Adaptive);
    img.write_with_encoder(encoder)?;
    Ok(buffer)
}

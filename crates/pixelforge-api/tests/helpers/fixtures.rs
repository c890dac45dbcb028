//! In-memory test images

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

/// Opaque gradient PNG
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 120, 255])
    });
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// PNG whose top-left pixel is fully transparent
pub fn png_with_transparency(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([30, 160, 90, 255]));
    img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 3 % 256) as u8, 200])
    });
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// Solid-colour AVIF, encoded with the `image` crate's rav1e encoder
pub fn avif(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 90, 210]));
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Avif)
}

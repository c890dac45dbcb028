pub mod image;

pub use image::{ProcessedImage, RawImageInput};

pub mod compress;
pub mod convert;
pub mod duplicate;
pub mod health;
pub mod remove_background;
pub mod upload;

use pixelforge_core::ProcessedImage;
use serde::Serialize;

/// `{results, meta}` body shared by the JSON transform endpoints
#[derive(Debug, Serialize)]
pub struct TransformResponse<M> {
    pub results: Vec<ProcessedImage>,
    pub meta: M,
}

use crate::validator::SUPPORTED_MIME_TYPES;

/// Message returned to callers rejected by the admission gate
pub const BUSY_MESSAGE: &str =
    "server is busy processing other background removals; retry shortly";

/// Errors produced by the transform pipeline
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Unsupported format: {mime} (supported: {})", SUPPORTED_MIME_TYPES.join(", "))]
    UnsupportedFormat { mime: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Input image is empty")]
    EmptyInput,

    #[error("{}", BUSY_MESSAGE)]
    Busy,

    #[error("{0}")]
    Segmentation(String),

    #[error("{0}")]
    Processing(String),

    #[error("Failed to build archive: {0}")]
    Archive(String),
}

impl From<image::ImageError> for ProcessingError {
    fn from(err: image::ImageError) -> Self {
        ProcessingError::Processing(err.to_string())
    }
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        ProcessingError::Processing(err.to_string())
    }
}

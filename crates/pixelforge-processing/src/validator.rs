//! Input format validation

use crate::error::ProcessingError;

/// MIME types accepted as transform input
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/avif",
    "image/heic",
    "image/heif",
];

/// Normalize a declared content type: drop parameters, trim, lowercase
fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

pub fn is_supported(mime: &str) -> bool {
    let normalized = normalize_mime(mime);
    SUPPORTED_MIME_TYPES.contains(&normalized.as_str())
}

/// Reject any declared MIME type outside the supported set
pub fn ensure_supported(mime: &str) -> Result<(), ProcessingError> {
    if is_supported(mime) {
        Ok(())
    } else {
        tracing::debug!(mime = %mime, "Rejected unsupported input format");
        Err(ProcessingError::UnsupportedFormat {
            mime: mime.to_string(),
        })
    }
}

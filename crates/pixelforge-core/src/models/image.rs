//! Image payloads exchanged between the HTTP boundary and the transforms.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;

/// An uploaded file as handed over by the form-parsing layer.
///
/// Owned by the transform it is passed into and never mutated.
#[derive(Debug, Clone)]
pub struct RawImageInput {
    pub bytes: Bytes,
    pub declared_mime: String,
    pub filename: String,
}

impl RawImageInput {
    pub fn new(
        bytes: impl Into<Bytes>,
        declared_mime: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            declared_mime: declared_mime.into(),
            filename: filename.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of a successful transform.
///
/// `size` and `base64` are derived from `bytes` at construction, so the three
/// can never disagree. Serializes as `{name, mime, size, base64}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedImage {
    name: String,
    mime: String,
    #[serde(rename = "size")]
    size_bytes: usize,
    #[serde(skip)]
    bytes: Bytes,
    base64: String,
}

impl ProcessedImage {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime: mime.into(),
            size_bytes: bytes.len(),
            base64: STANDARD.encode(&bytes),
            bytes,
        }
    }

    /// Copy of this image under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

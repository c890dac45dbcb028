//! Limits shared by the transform pipeline and the HTTP boundary.

/// Upload size limit applied before any bytes reach a transform.
pub const MAX_UPLOAD_SIZE_MB: usize = 15;

/// Upper bound on copies produced by a single duplicate request.
pub const MAX_DUPLICATE_COUNT: usize = 20;

/// Default capacity of the background-removal admission gate.
pub const BG_REMOVAL_MAX_CONCURRENT: usize = 2;

/// Media type of packaged archive entries.
pub const ARCHIVE_MIME: &str = "application/zip";

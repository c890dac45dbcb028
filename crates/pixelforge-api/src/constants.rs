//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Slack added to the upload limit for multipart boundaries and text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Seconds a client is asked to wait after a busy rejection
pub const BUSY_RETRY_AFTER_SECS: u64 = 5;

/// Multipart field carrying the uploaded image
pub const FILE_FIELD: &str = "file";

/// Suffix of the background-removal download name
pub const NO_BACKGROUND_SUFFIX: &str = "-no-bg";

//! Pixelforge Infrastructure Library
//!
//! Shared infrastructure used by the Pixelforge services:
//! - Middleware (request ID)
//! - Telemetry initialization (tracing subscriber)
//! - Archive creation

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "archive")]
pub mod archive;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

#[cfg(feature = "archive")]
pub use archive::{create_zip_archive, ArchiveEntry};

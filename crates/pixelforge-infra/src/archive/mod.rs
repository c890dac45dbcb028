//! Archive creation
//!
//! Bundles in-memory files into a single ZIP payload.

pub use service::{create_zip_archive, ArchiveEntry};

mod service;

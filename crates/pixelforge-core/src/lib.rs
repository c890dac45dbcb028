//! Pixelforge Core Library
//!
//! This crate provides the error taxonomy, configuration and image models
//! shared by every Pixelforge crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, ErrorProfile, LogLevel};
pub use models::{ProcessedImage, RawImageInput};

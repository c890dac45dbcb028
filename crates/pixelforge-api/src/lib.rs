//! Pixelforge API Library
//!
//! HTTP boundary for the transform pipeline: multipart parsing, handlers,
//! error mapping and application setup.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;

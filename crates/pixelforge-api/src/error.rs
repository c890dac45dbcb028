//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Anything that
//! converts into `AppError` (processing errors, multipart rejections) renders
//! through one path: status, JSON body and a single log line.

use axum::{
    extract::multipart::MultipartError,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use pixelforge_core::{AppError, ErrorMetadata, LogLevel};
use pixelforge_services::ProcessingError;
use serde::Serialize;

use crate::constants::BUSY_RETRY_AFTER_SECS;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Needed because of the orphan rule: both `IntoResponse` and `AppError` are foreign here.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app_error = match err {
            ProcessingError::UnsupportedFormat { .. } => {
                AppError::UnsupportedFormat(err.to_string())
            }
            ProcessingError::InvalidOption(msg) => AppError::InvalidInput(msg),
            ProcessingError::EmptyInput => AppError::EmptyInput(err.to_string()),
            ProcessingError::Busy => AppError::Busy(err.to_string()),
            ProcessingError::Segmentation(msg) => AppError::Segmentation(msg),
            ProcessingError::Processing(msg) => AppError::ImageProcessing(msg),
            ProcessingError::Archive(_) => AppError::Internal(err.to_string()),
        };
        HttpAppError(app_error)
    }
}

/// Body-limit violations surface as multipart errors carrying 413
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app_error = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
        };
        HttpAppError(app_error)
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, code, "Request rejected"),
        LogLevel::Warn => tracing::warn!(error = %error, code, "Request rejected"),
        LogLevel::Error => tracing::error!(error = %error, code, "Request failed"),
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production and never for sensitive errors
        let show_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        let mut response = (status, Json(body)).into_response();
        if matches!(app_error, AppError::Busy(_)) {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(BUSY_RETRY_AFTER_SECS),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ProcessingError) -> StatusCode {
        HttpAppError::from(err).into_response().status()
    }

    #[test]
    fn test_processing_error_status_mapping() {
        assert_eq!(
            status_of(ProcessingError::UnsupportedFormat {
                mime: "image/gif".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ProcessingError::InvalidOption("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ProcessingError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ProcessingError::Busy), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            status_of(ProcessingError::Segmentation("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ProcessingError::Processing("corrupt".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_busy_sets_retry_after() {
        let response = HttpAppError::from(ProcessingError::Busy).into_response();
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            &BUSY_RETRY_AFTER_SECS.to_string()
        );
    }

    #[test]
    fn test_segmentation_message_is_kept() {
        let HttpAppError(app_error) =
            HttpAppError::from(ProcessingError::Segmentation("model unavailable".to_string()));
        assert!(app_error.client_message().contains("model unavailable"));
    }
}

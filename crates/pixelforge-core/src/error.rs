//! Application error taxonomy
//!
//! Every failure a transform request can end in is an `AppError`. Each variant
//! carries a fixed [`ErrorProfile`] that the HTTP layer renders from, so status
//! codes and machine codes live in one table instead of in every handler.

/// Severity used when the HTTP boundary logs an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes: bad fields, unsupported uploads
    Debug,
    /// Load shedding
    Warn,
    /// Server-side failures
    Error,
}

/// How an error presents itself to clients and to the log
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine-readable code, e.g. `UNSUPPORTED_FORMAT`
    fn error_code(&self) -> &'static str;

    /// True when retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to put in a response body
    fn client_message(&self) -> String;

    /// Sensitive errors never expose details, in any environment
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(source: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: source.to_string(),
            source,
        }
    }
}

/// Fixed presentation of one `AppError` variant
#[derive(Debug, Clone, Copy)]
pub struct ErrorProfile {
    pub status: u16,
    pub code: &'static str,
    pub kind: &'static str,
    pub recoverable: bool,
    pub sensitive: bool,
    pub suggested_action: Option<&'static str>,
    pub log_level: LogLevel,
}

const fn client_error(
    code: &'static str,
    kind: &'static str,
    action: &'static str,
) -> ErrorProfile {
    ErrorProfile {
        status: 400,
        code,
        kind,
        recoverable: false,
        sensitive: false,
        suggested_action: Some(action),
        log_level: LogLevel::Debug,
    }
}

const INVALID_INPUT: ErrorProfile = client_error(
    "INVALID_INPUT",
    "InvalidInput",
    "Check the form fields and try again",
);

const UNSUPPORTED_FORMAT: ErrorProfile = client_error(
    "UNSUPPORTED_FORMAT",
    "UnsupportedFormat",
    "Upload a JPEG, PNG, WebP, AVIF or HEIC/HEIF image",
);

const EMPTY_INPUT: ErrorProfile =
    client_error("EMPTY_INPUT", "EmptyInput", "Upload a non-empty image file");

const PAYLOAD_TOO_LARGE: ErrorProfile = ErrorProfile {
    status: 413,
    ..client_error("PAYLOAD_TOO_LARGE", "PayloadTooLarge", "Upload a smaller file")
};

const BUSY: ErrorProfile = ErrorProfile {
    status: 429,
    code: "BUSY",
    kind: "Busy",
    recoverable: true,
    sensitive: false,
    suggested_action: Some("Wait a few seconds and retry"),
    log_level: LogLevel::Warn,
};

const SEGMENTATION: ErrorProfile = ErrorProfile {
    status: 500,
    code: "SEGMENTATION_ERROR",
    kind: "Segmentation",
    recoverable: true,
    sensitive: false,
    suggested_action: Some("Retry later; the segmentation backend may be unavailable"),
    log_level: LogLevel::Error,
};

const IMAGE_PROCESSING: ErrorProfile = ErrorProfile {
    status: 500,
    code: "IMAGE_PROCESSING_ERROR",
    kind: "ImageProcessing",
    recoverable: false,
    sensitive: false,
    suggested_action: Some("Make sure the file is a valid image of the declared type"),
    log_level: LogLevel::Error,
};

const INTERNAL: ErrorProfile = ErrorProfile {
    status: 500,
    code: "INTERNAL_ERROR",
    kind: "Internal",
    recoverable: true,
    sensitive: true,
    suggested_action: None,
    log_level: LogLevel::Error,
};

impl AppError {
    pub fn profile(&self) -> &'static ErrorProfile {
        match self {
            AppError::InvalidInput(_) => &INVALID_INPUT,
            AppError::UnsupportedFormat(_) => &UNSUPPORTED_FORMAT,
            AppError::EmptyInput(_) => &EMPTY_INPUT,
            AppError::PayloadTooLarge(_) => &PAYLOAD_TOO_LARGE,
            AppError::Busy(_) => &BUSY,
            AppError::Segmentation(_) => &SEGMENTATION,
            AppError::ImageProcessing(_) => &IMAGE_PROCESSING,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => &INTERNAL,
        }
    }

    /// Variant name, shown next to details outside production
    pub fn error_type(&self) -> &'static str {
        self.profile().kind
    }

    /// Display text followed by up to five `Caused by:` lines
    pub fn detailed_message(&self) -> String {
        const MAX_CAUSES: usize = 5;

        let mut details = self.to_string();
        let mut causes =
            std::iter::successors(std::error::Error::source(self), |err| err.source());
        for cause in causes.by_ref().take(MAX_CAUSES) {
            details.push_str(&format!("\n  Caused by: {}", cause));
        }
        if causes.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.profile().status
    }

    fn error_code(&self) -> &'static str {
        self.profile().code
    }

    fn is_recoverable(&self) -> bool {
        self.profile().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.profile().suggested_action
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::UnsupportedFormat(msg)
            | AppError::EmptyInput(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Busy(msg) => msg.clone(),
            AppError::Segmentation(msg) => format!("Background segmentation failed: {}", msg),
            AppError::ImageProcessing(msg) => format!("Image processing failed: {}", msg),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        self.profile().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.profile().log_level
    }
}

//! Multipart form parsing for transform uploads

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use pixelforge_core::{AppError, RawImageInput};

use crate::constants::FILE_FIELD;
use crate::error::HttpAppError;

/// A parsed upload: at most one file plus any text fields
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<RawImageInput>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read every field. Exactly one `file` field is allowed; oversized files fail with 413.
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_file_size: usize,
    ) -> Result<Self, HttpAppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

            if field_name == FILE_FIELD {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    )
                    .into());
                }

                let filename = sanitize_filename(field.file_name().unwrap_or_default());
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;

                validate_file_size(data.len(), max_file_size)?;
                form.file = Some(RawImageInput::new(data, content_type, filename));
            } else if !field_name.is_empty() {
                let value = field.text().await?;
                form.fields.insert(field_name, value);
            }
        }

        Ok(form)
    }

    /// The uploaded file; missing or empty uploads are client errors
    pub fn take_file(&mut self) -> Result<RawImageInput, AppError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
        if file.is_empty() {
            return Err(AppError::EmptyInput("Uploaded file is empty".to_string()));
        }
        Ok(file)
    }

    /// Trimmed text field, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Quality as a float; unparsable or non-finite values count as absent
    pub fn quality(&self, name: &str) -> Option<f64> {
        self.text(name)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|q| q.is_finite())
    }

    /// Optional strictly positive integer
    pub fn positive_int(&self, name: &str) -> Result<Option<u32>, AppError> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value > 0 => Ok(Some(value)),
                _ => Err(AppError::InvalidInput(format!(
                    "{} must be a positive integer, got: {}",
                    name, raw
                ))),
            },
        }
    }

    /// Optional integer of any sign
    pub fn int(&self, name: &str) -> Result<Option<i64>, AppError> {
        self.text(name)
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    AppError::InvalidInput(format!("{} must be an integer, got: {}", name, raw))
                })
            })
            .transpose()
    }
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Keep only the final path component of a client-supplied filename
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = Path::new(filename.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| *n != "..")
        .unwrap_or_default();

    filename_only.chars().take(MAX_FILENAME_LENGTH).collect()
}

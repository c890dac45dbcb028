use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use pixelforge_services::{ensure_supported, naming};

use super::upload::UploadForm;
use crate::constants::NO_BACKGROUND_SUFFIX;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Remove background handler: responds with the cut-out PNG as a download
#[tracing::instrument(skip(state, multipart), fields(operation = "remove_background"))]
pub async fn remove_background(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let mut form =
        UploadForm::from_multipart(multipart, state.config.max_upload_size_bytes()).await?;
    let input = form.take_file()?;
    ensure_supported(&input.declared_mime)?;

    let output = state
        .background_removal
        .remove_background(input.bytes)
        .await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_name(&input.filename)
    );
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output,
    )
        .into_response())
}

/// `<base>-no-bg.png`, restricted to header-safe characters
fn download_name(filename: &str) -> String {
    let base: String = naming::base_name(filename)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}.png", base, NO_BACKGROUND_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_name() {
        assert_eq!(download_name("portrait.jpg"), "portrait-no-bg.png");
        assert_eq!(download_name("my \"cat\".png"), "my__cat_-no-bg.png");
        assert_eq!(download_name(""), "image-no-bg.png");
        assert_eq!(download_name("noext"), "noext-no-bg.png");
    }

    #[test]
    fn test_download_name_matches_other_output_names() {
        assert_eq!(download_name(".hidden"), ".hidden-no-bg.png");
        assert_eq!(download_name("trailing."), "trailing.-no-bg.png");
        assert_eq!(download_name("  photo.jpg "), "photo-no-bg.png");
        assert_eq!(download_name("archive.tar.gz"), "archive.tar-no-bg.png");
    }
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use pixelforge_core::ProcessedImage;
use pixelforge_services::{ensure_supported, DuplicationPackager};
use serde::{Deserialize, Serialize};

use super::upload::UploadForm;
use super::TransformResponse;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DuplicateQuery {
    #[serde(default)]
    pub zip: bool,
}

#[derive(Debug, Serialize)]
pub struct DuplicateMeta {
    pub count: usize,
    pub zipped: bool,
}

/// Duplicate handler
///
/// `count` defaults to 1 and is capped at 20. With `?zip=true` and more than
/// one copy, the copies come back as a single ZIP entry.
#[tracing::instrument(skip(state, multipart), fields(operation = "duplicate", zip = query.zip))]
pub async fn duplicate_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DuplicateQuery>,
    multipart: Multipart,
) -> Result<Json<TransformResponse<DuplicateMeta>>, HttpAppError> {
    let mut form =
        UploadForm::from_multipart(multipart, state.config.max_upload_size_bytes()).await?;
    let input = form.take_file()?;
    let count = form.int("count")?.unwrap_or(1);

    ensure_supported(&input.declared_mime)?;

    let name = if input.filename.is_empty() {
        "image".to_string()
    } else {
        input.filename
    };
    let original = ProcessedImage::new(name, input.declared_mime, input.bytes);
    let copies = DuplicationPackager::duplicate(&original, count);
    let count = copies.len();

    let zipped = query.zip && count > 1;
    let results = if zipped {
        let archive =
            tokio::task::spawn_blocking(move || DuplicationPackager::package_as_archive(copies))
                .await
                .map_err(|e| anyhow::anyhow!("Archive task failed: {}", e))??;
        vec![archive]
    } else {
        copies
    };

    Ok(Json(TransformResponse {
        results,
        meta: DuplicateMeta { count, zipped },
    }))
}

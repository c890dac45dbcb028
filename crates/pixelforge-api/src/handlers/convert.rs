use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use pixelforge_services::ConversionEngine;
use serde::Serialize;

use super::upload::UploadForm;
use super::TransformResponse;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConvertMeta {
    pub format: &'static str,
}

/// Convert handler: re-encode the upload as lossless PNG
#[tracing::instrument(skip(state, multipart), fields(operation = "convert"))]
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<TransformResponse<ConvertMeta>>, HttpAppError> {
    let mut form =
        UploadForm::from_multipart(multipart, state.config.max_upload_size_bytes()).await?;
    let input = form.take_file()?;

    let result = tokio::task::spawn_blocking(move || ConversionEngine::to_canonical(&input))
        .await
        .map_err(|e| anyhow::anyhow!("Conversion task failed: {}", e))??;

    Ok(Json(TransformResponse {
        results: vec![result],
        meta: ConvertMeta { format: "png" },
    }))
}

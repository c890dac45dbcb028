use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use pixelforge_services::{CompressOptions, CompressionEngine, OutputFormat, QualityPreset};
use serde::Serialize;

use super::upload::UploadForm;
use super::TransformResponse;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressMeta {
    pub preset: &'static str,
    pub quality: u8,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub format: &'static str,
}

/// Compress handler
///
/// Fields: `file`, `preset` (high|medium|low), `quality` (1-100, wins over
/// preset), `maxWidth`, `maxHeight`, `format` (jpeg|jpg|webp|png).
#[tracing::instrument(skip(state, multipart), fields(operation = "compress"))]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<TransformResponse<CompressMeta>>, HttpAppError> {
    let mut form =
        UploadForm::from_multipart(multipart, state.config.max_upload_size_bytes()).await?;
    let input = form.take_file()?;

    let target_format = match form.text("format") {
        Some(raw) => raw.parse::<OutputFormat>()?,
        None => OutputFormat::default(),
    };
    let options = CompressOptions {
        explicit_quality: form.quality("quality"),
        preset: form.text("preset").and_then(QualityPreset::from_name),
        max_width: form.positive_int("maxWidth")?,
        max_height: form.positive_int("maxHeight")?,
        target_format,
    };

    let result = tokio::task::spawn_blocking(move || CompressionEngine::compress(&input, &options))
        .await
        .map_err(|e| anyhow::anyhow!("Compression task failed: {}", e))??;

    let meta = CompressMeta {
        preset: options.preset.unwrap_or_default().as_str(),
        quality: options.quality(),
        max_width: options.max_width,
        max_height: options.max_height,
        format: options.target_format.as_str(),
    };

    Ok(Json(TransformResponse {
        results: vec![result],
        meta,
    }))
}

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use pixelforge_processing::{SegmentationConfig, Segmenter};
use reqwest::multipart::{Form, Part};

/// Segmentation over HTTP.
///
/// Sends the prepared image as multipart field `image` together with the
/// requested output format and quality, and expects the segmented image back
/// as the raw response body.
pub struct RemoteSegmenter {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl Debug for RemoteSegmenter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RemoteSegmenter")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RemoteSegmenter {
    /// No timeout is applied unless one is given
    pub fn new(url: &str, api_key: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .context("Failed to create HTTP client for segmentation backend")?;

        Ok(Self {
            http_client,
            url: url.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Segmenter for RemoteSegmenter {
    async fn segment(&self, image: Bytes, config: &SegmentationConfig) -> Result<Bytes> {
        let image_part = Part::bytes(image.to_vec())
            .file_name("image.png")
            .mime_str("image/png")
            .context("Failed to build multipart body")?;
        let form = Form::new()
            .part("image", image_part)
            .text("output_format", config.output_format.clone())
            .text("output_quality", config.output_quality.to_string());

        let mut request = self.http_client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach segmentation backend")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Segmentation backend returned {} - {}",
                status,
                error_text
            ));
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read segmentation response")?;

        if body.is_empty() {
            return Err(anyhow::anyhow!("Segmentation backend returned an empty body"));
        }

        tracing::debug!(output_bytes = body.len(), "Segmentation completed");
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    /// Echoes the uploaded image back, reversed, after checking the form
    async fn echo(headers: HeaderMap, mut multipart: Multipart) -> Result<Vec<u8>, StatusCode> {
        if headers.get("authorization").map(|v| v.as_bytes()) != Some(b"Bearer secret") {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let mut image = None;
        let mut format = None;
        let bad_request = |_| StatusCode::BAD_REQUEST;
        while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
            match field.name() {
                Some("image") => image = Some(field.bytes().await.map_err(bad_request)?),
                Some("output_format") => format = Some(field.text().await.map_err(bad_request)?),
                _ => {}
            }
        }

        match (image, format.as_deref()) {
            (Some(image), Some("image/png")) => Ok(image.iter().rev().copied().collect()),
            _ => Err(StatusCode::UNPROCESSABLE_ENTITY),
        }
    }

    async fn unavailable() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "model is loading")
    }

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/segment", post(echo))
            .route("/down", post(unavailable));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_segment_round_trip() {
        let base = spawn_backend().await;
        let segmenter = RemoteSegmenter::new(
            &format!("{}/segment", base),
            Some("secret".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        let out = segmenter
            .segment(Bytes::from_static(b"abc"), &SegmentationConfig::default())
            .await
            .unwrap();
        assert_eq!(out.as_ref(), b"cba");
    }

    #[tokio::test]
    async fn test_missing_key_is_rejected_by_backend() {
        let base = spawn_backend().await;
        let segmenter = RemoteSegmenter::new(&format!("{}/segment", base), None, None).unwrap();

        let err = segmenter
            .segment(Bytes::from_static(b"abc"), &SegmentationConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_backend_error_body_is_surfaced() {
        let base = spawn_backend().await;
        let segmenter = RemoteSegmenter::new(&format!("{}/down", base), None, None).unwrap();

        let err = segmenter
            .segment(Bytes::from_static(b"abc"), &SegmentationConfig::default())
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("model is loading"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let segmenter =
            RemoteSegmenter::new("http://localhost:9/segment", Some("secret".to_string()), None)
                .unwrap();
        let debug = format!("{:?}", segmenter);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}

//! Compress, convert, duplicate and health endpoint tests.
//!
//! Run with: `cargo test -p pixelforge-api --test transform_test`

mod helpers;

use std::io::Cursor;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::{file_form, fixtures, setup_test_app};
use serde_json::Value;

fn decode_result(result: &Value) -> image::DynamicImage {
    let bytes = STANDARD
        .decode(result["base64"].as_str().unwrap())
        .unwrap();
    assert_eq!(result["size"].as_u64().unwrap() as usize, bytes.len());
    image::load_from_memory(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let response = app.client().get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "alive");
}

#[tokio::test]
async fn test_compress_defaults() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/api/compress")
        .multipart(file_form(fixtures::png(64, 48), "photo.png", "image/png"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    let result = &body["results"][0];
    assert_eq!(result["name"], "photo.jpg");
    assert_eq!(result["mime"], "image/jpeg");

    assert_eq!(body["meta"]["preset"], "high");
    assert_eq!(body["meta"]["quality"], 90);
    assert_eq!(body["meta"]["format"], "jpeg");
    assert!(body["meta"]["maxWidth"].is_null());

    let decoded = decode_result(result);
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[tokio::test]
async fn test_compress_with_options() {
    let app = setup_test_app();
    let form = file_form(fixtures::jpeg(400, 200), "landscape.jpg", "image/jpeg")
        .add_text("preset", "low")
        .add_text("quality", "150")
        .add_text("maxWidth", "100")
        .add_text("maxHeight", "100")
        .add_text("format", "webp");

    let response = app.client().post("/api/compress").multipart(form).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["quality"], 100);
    assert_eq!(body["meta"]["preset"], "low");
    assert_eq!(body["meta"]["maxWidth"], 100);
    assert_eq!(body["meta"]["format"], "webp");

    let result = &body["results"][0];
    assert_eq!(result["name"], "landscape.webp");
    assert_eq!(result["mime"], "image/webp");
    let decoded = decode_result(result);
    assert_eq!((decoded.width(), decoded.height()), (100, 50));
}

#[tokio::test]
async fn test_compress_unknown_preset_falls_back_to_high() {
    let app = setup_test_app();
    let form = file_form(fixtures::png(8, 8), "a.png", "image/png").add_text("preset", "ultra");

    let response = app.client().post("/api/compress").multipart(form).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["meta"]["quality"], 90);
}

#[tokio::test]
async fn test_compress_rejects_bad_fields() {
    let app = setup_test_app();

    for (field, value) in [("format", "gif"), ("maxWidth", "0"), ("maxHeight", "tall")] {
        let form = file_form(fixtures::png(8, 8), "a.png", "image/png").add_text(field, value);
        let response = app.client().post("/api/compress").multipart(form).await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "{}={}",
            field,
            value
        );
    }
}

#[tokio::test]
async fn test_compress_accepts_avif() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/api/compress")
        .multipart(file_form(fixtures::avif(32, 24), "sky.avif", "image/avif"))
        .await;

    response.assert_status_ok();
    let result = &response.json::<Value>()["results"][0];
    assert_eq!(result["name"], "sky.jpg");
    assert_eq!(result["mime"], "image/jpeg");
    let decoded = decode_result(result);
    assert_eq!((decoded.width(), decoded.height()), (32, 24));
}

#[tokio::test]
async fn test_compress_rejects_unsupported_mime() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/api/compress")
        .multipart(file_form(b"GIF89a".to_vec(), "anim.gif", "image/gif"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "UNSUPPORTED_FORMAT");
    assert!(body["error"].as_str().unwrap().contains("image/gif"));
}

#[tokio::test]
async fn test_missing_or_empty_file_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/api/compress")
        .multipart(MultipartForm::new().add_text("preset", "low"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .client()
        .post("/api/convert")
        .multipart(file_form(Vec::new(), "empty.png", "image/png"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "EMPTY_INPUT");
}

#[tokio::test]
async fn test_corrupt_image_is_processing_error() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/api/compress")
        .multipart(file_form(b"not really a png".to_vec(), "bad.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["code"], "IMAGE_PROCESSING_ERROR");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = setup_test_app();
    let limit = app.state.config.max_upload_size_bytes();
    let response = app
        .client()
        .post("/api/convert")
        .multipart(file_form(vec![0u8; limit + 1], "huge.png", "image/png"))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_convert_to_png() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/api/convert")
        .multipart(file_form(fixtures::jpeg(20, 10), "photo.jpg", "image/jpeg"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["format"], "png");

    let result = &body["results"][0];
    assert_eq!(result["name"], "photo.png");
    assert_eq!(result["mime"], "image/png");
    let decoded = decode_result(result);
    assert_eq!((decoded.width(), decoded.height()), (20, 10));
}

#[tokio::test]
async fn test_convert_keeps_transparency() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/api/convert")
        .multipart(file_form(
            fixtures::png_with_transparency(4, 4),
            "logo.png",
            "image/png",
        ))
        .await;

    response.assert_status_ok();
    let decoded = decode_result(&response.json::<Value>()["results"][0]).to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    assert_eq!(decoded.get_pixel(3, 3)[3], 255);
}

#[tokio::test]
async fn test_duplicate_returns_named_copies() {
    let app = setup_test_app();
    let form = file_form(fixtures::png(4, 4), "icon.png", "image/png").add_text("count", "3");

    let response = app.client().post("/api/duplicate").multipart(form).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    let names: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["icon-copy-1.png", "icon-copy-2.png", "icon-copy-3.png"]);
    assert_eq!(body["meta"]["count"], 3);
    assert_eq!(body["meta"]["zipped"], false);
}

#[tokio::test]
async fn test_duplicate_count_is_capped_and_defaults_to_one() {
    let app = setup_test_app();

    let form = file_form(fixtures::png(4, 4), "icon.png", "image/png").add_text("count", "500");
    let response = app.client().post("/api/duplicate").multipart(form).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["results"].as_array().unwrap().len(), 20);

    let response = app
        .client()
        .post("/api/duplicate")
        .multipart(file_form(fixtures::png(4, 4), "icon.png", "image/png"))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["results"][0]["name"], "icon-copy-1.png");
}

#[tokio::test]
async fn test_duplicate_rejects_unparsable_count() {
    let app = setup_test_app();
    let form = file_form(fixtures::png(4, 4), "icon.png", "image/png").add_text("count", "many");

    let response = app.client().post("/api/duplicate").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_zip() {
    let app = setup_test_app();
    let form = file_form(fixtures::png(4, 4), "icon.png", "image/png").add_text("count", "2");

    let response = app
        .client()
        .post("/api/duplicate")
        .add_query_param("zip", "true")
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["zipped"], true);
    assert_eq!(body["meta"]["count"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "icon-copies.zip");
    assert_eq!(results[0]["mime"], "application/zip");

    let bytes = STANDARD.decode(results[0]["base64"].as_str().unwrap()).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, ["icon-copy-1.png", "icon-copy-2.png"]);
}

#[tokio::test]
async fn test_duplicate_zip_with_single_copy_is_not_zipped() {
    let app = setup_test_app();
    let form = file_form(fixtures::png(4, 4), "icon.png", "image/png").add_text("count", "1");

    let response = app
        .client()
        .post("/api/duplicate")
        .add_query_param("zip", "true")
        .multipart(form)
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["meta"]["zipped"], false);
    assert_eq!(body["results"][0]["name"], "icon-copy-1.png");
    assert_eq!(body["results"][0]["mime"], "image/png");
}

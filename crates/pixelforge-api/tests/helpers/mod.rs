//! Test helpers: build AppState and router for integration tests.
//!
//! Run with `cargo test -p pixelforge-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod segmenters;

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use pixelforge_api::setup::routes;
use pixelforge_api::AppState;
use pixelforge_core::Config;
use pixelforge_services::Segmenter;

/// Test application: server plus the state it was built from.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Test app with a segmenter that cuts away the left half of the image
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(segmenters::HalfCutoutSegmenter::default()))
}

pub fn setup_test_app_with(segmenter: Arc<dyn Segmenter>) -> TestApp {
    let config = Config::default();
    let state = Arc::new(AppState::new(config.clone(), segmenter));
    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");
    TestApp { server, state }
}

/// Multipart form with a single `file` field
pub fn file_form(bytes: Vec<u8>, filename: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes).file_name(filename).mime_type(mime),
    )
}

//! Application state shared by all handlers

use std::sync::Arc;

use pixelforge_core::Config;
use pixelforge_services::{AdmissionGate, BackgroundRemovalPipeline, Segmenter};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub background_removal: BackgroundRemovalPipeline,
}

impl AppState {
    /// The admission gate is sized from `BG_REMOVAL_MAX_CONCURRENT` and lives as long as the state
    pub fn new(config: Config, segmenter: Arc<dyn Segmenter>) -> Self {
        let gate = Arc::new(AdmissionGate::new(config.bg_removal_max_concurrent()));
        let background_removal = BackgroundRemovalPipeline::new(gate, segmenter);
        Self {
            config,
            background_removal,
        }
    }
}

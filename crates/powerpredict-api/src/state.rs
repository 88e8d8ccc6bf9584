//! Application state shared across all route handlers.
//!
//! AppState holds the loaded configuration and the optional fallback
//! assistant. It is passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use powerpredict_chat::CompletionService;
use powerpredict_core::config::PowerPredictConfig;

/// Shared application state.
///
/// All fields are cheap to clone across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration. Read-only while serving.
    pub config: Arc<PowerPredictConfig>,
    /// LLM fallback behind `POST /api/chat`, if configured.
    pub assistant: Option<Arc<dyn CompletionService>>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// State without a fallback assistant.
    pub fn new(config: PowerPredictConfig) -> Self {
        Self {
            config: Arc::new(config),
            assistant: None,
            start_time: Instant::now(),
        }
    }

    /// Attach a fallback assistant.
    pub fn with_assistant(mut self, assistant: Arc<dyn CompletionService>) -> Self {
        self.assistant = Some(assistant);
        self
    }
}

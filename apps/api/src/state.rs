use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no plan data: every request is self-contained.
#[derive(Clone)]
pub struct AppState {
    /// Gemini in production; a fake in tests.
    pub generator: Arc<dyn TextGenerator>,
}

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Completer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Completion provider. `LlmClient` in production, a fake in tests.
    pub completer: Arc<dyn Completer>,
}

use std::sync::Arc;

use crate::analysis::controller::InteractionController;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Converter and model client are fixed at startup and shared read-only.
    pub controller: Arc<InteractionController>,
    pub config: Config,
}

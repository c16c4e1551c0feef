use std::sync::Arc;

use crate::catalog::ContentSource;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Where templates, records and tenants come from. Default: InMemoryCatalog.
    pub source: Arc<dyn ContentSource>,
}

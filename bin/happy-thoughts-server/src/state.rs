//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// The thought store, opened once at startup.
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

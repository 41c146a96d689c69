//! Application state shared across handlers

use std::sync::Arc;

use crate::{config::AppConfig, session::SessionStore, storage::Storage};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        storage: Arc<dyn Storage>,
        sessions: Arc<dyn SessionStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            storage,
            sessions,
            config: Arc::new(config),
        }
    }
}

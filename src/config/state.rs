// Application state module
// Manages runtime state shared across connections

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::templates::TemplateStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub templates: TemplateStore,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let templates = TemplateStore::new(&config.routes.templates_dir, config.server.debug);

        Self {
            config: config.clone(),
            templates,
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}

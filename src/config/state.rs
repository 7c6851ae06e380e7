// Application state module
// Immutable per-process state shared across request handlers

use std::sync::atomic::AtomicBool;

use super::types::Config;

/// Application state
///
/// Constructed once at startup and shared behind an `Arc`. All request
/// handling is read-only, so no interior locking is needed.
pub struct AppState {
    pub config: Config,

    // Cached config value for fast access on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config: config.clone(),
            cached_access_log,
        }
    }
}

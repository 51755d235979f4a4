use attendant_core::config::Config;
use attendant_core::store::FileStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub store: Arc<FileStore>,
    /// Area used by reconcile requests that do not name one.
    pub default_area: Option<String>,
}

impl AppState {
    /// Serve the file store under `root`. A missing or unreadable config
    /// falls back to defaults.
    pub fn new(root: PathBuf) -> Self {
        let config = Config::load_or_default(&root).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read config, using defaults");
            Config::new()
        });
        let store = Arc::new(FileStore::new(&root));
        Self {
            root,
            store,
            default_area: config.reconcile.default_area,
        }
    }
}

//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::session::SessionTracker;
use crate::storage::ContentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    content_store: ContentStore,
    sessions: SessionTracker,
}

impl AppState {
    /// Create state backed by the local filesystem store from `config`
    pub fn new(config: Config) -> Self {
        let content_store = ContentStore::with_local_storage(config.storage.root.clone());
        Self::with_store(config, content_store)
    }

    /// Create state around an already constructed content store
    pub fn with_store(config: Config, content_store: ContentStore) -> Self {
        let sessions = SessionTracker::new(&config.session);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                content_store,
                sessions,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the content store
    pub fn content_store(&self) -> &ContentStore {
        &self.inner.content_store
    }

    /// Get the session tracker
    pub fn sessions(&self) -> &SessionTracker {
        &self.inner.sessions
    }
}

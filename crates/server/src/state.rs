//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::search::{self, SearchIndex};
use crate::services::media::MediaStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to configuration, the
/// database pool, the search index, and the media store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    search: SearchIndex,
    media: MediaStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let media = MediaStore::new(
            config.media_dir.clone(),
            &config.base_url,
            config.media_signing_secret.clone(),
        );
        let search = SearchIndex::new();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                search,
                media,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the search index.
    #[must_use]
    pub fn search(&self) -> &SearchIndex {
        &self.inner.search
    }

    /// Get a reference to the media store.
    #[must_use]
    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }

    /// Schedule a background rebuild of the search index.
    ///
    /// Called at startup and after every catalog mutation so the index
    /// tracks the table.
    pub fn spawn_search_rebuild(&self) {
        search::spawn_rebuild(self.inner.search.clone(), self.inner.pool.clone());
    }
}

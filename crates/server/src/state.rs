//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::storage::LocalStorage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    provisioning_pool: PgPool,
    storage: LocalStorage,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - Pool for tenant reads and writes
    /// * `provisioning_pool` - Elevated pool, used only for shop provisioning
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool, provisioning_pool: PgPool) -> Self {
        let storage = LocalStorage::new(config.media_dir.clone(), config.media_base_url.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                provisioning_pool,
                storage,
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

    /// Get a reference to the provisioning connection pool.
    #[must_use]
    pub fn provisioning_pool(&self) -> &PgPool {
        &self.inner.provisioning_pool
    }

    /// Get a reference to the image storage.
    #[must_use]
    pub fn storage(&self) -> &LocalStorage {
        &self.inner.storage
    }
}

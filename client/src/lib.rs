//! Client-side data layer for the SEIJA magazine.
//!
//! [`ApiClient`] speaks the REST API, [`AuthStore`] owns the identity and its
//! persisted session pair, [`ArticleStore`] caches articles, categories and
//! comment threads, and [`AdminDashboard`] holds the admin counters. All of
//! them share one client, and through it one [`SessionStorage`].

pub mod admin;
pub mod api;
pub mod articles;
pub mod auth;
pub mod config;
pub mod storage;

use std::sync::Arc;

pub use admin::AdminDashboard;
pub use api::{ApiClient, ApiError, ApiResult};
pub use articles::{ActionOutcome, ArticleStore, LoadState, Mutation, SyncMode};
pub use auth::{AuthState, AuthStore};
pub use config::{ClientConfig, FallbackPolicy};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

/// The stores of one application instance, wired to a single client.
pub struct AppContext {
    pub client: Arc<ApiClient>,
    pub auth: AuthStore,
    pub articles: ArticleStore,
    pub admin: AdminDashboard,
}

impl AppContext {
    pub fn new(config: &ClientConfig, storage: Arc<dyn SessionStorage>) -> ApiResult<Self> {
        let client = Arc::new(ApiClient::from_config(config, storage)?);
        Ok(Self::with_client(client, config.fallback))
    }

    /// Session stored as files under `config.session_dir`.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::new(config.session_dir.clone()));
        Self::new(config, storage)
    }

    pub fn with_client(client: Arc<ApiClient>, fallback: FallbackPolicy) -> Self {
        Self {
            auth: AuthStore::restore(Arc::clone(&client)),
            articles: ArticleStore::new(Arc::clone(&client), fallback),
            admin: AdminDashboard::new(Arc::clone(&client)),
            client,
        }
    }
}

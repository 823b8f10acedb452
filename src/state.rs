// src/state.rs

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    authz::{AdminAuthorizer, SharedSecretAuthorizer},
    config::Config,
    store::PostStore,
    utils::crypto::ContentCipher,
};

#[derive(Clone)]
pub struct AppState {
    pub store: PostStore,
    pub config: Config,
    pub authorizer: Arc<dyn AdminAuthorizer>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let cipher = ContentCipher::new(&config.content_secret);
        let store = PostStore::new(pool, cipher, Duration::from_secs(config.cache_ttl_secs));
        let authorizer: Arc<dyn AdminAuthorizer> =
            Arc::new(SharedSecretAuthorizer::new(config.admin_secret.clone()));

        Self {
            store,
            config,
            authorizer,
        }
    }
}

impl FromRef<AppState> for PostStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AdminAuthorizer> {
    fn from_ref(state: &AppState) -> Self {
        state.authorizer.clone()
    }
}

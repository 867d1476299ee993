//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::auth::{RemoteSessionProvider, SessionProvider, StoreSessionProvider};
use crate::config::{AuthMode, Config};
use crate::entities::SqliteStore;
use crate::error::ServerError;
use crate::upstream::UpstreamClient;

/// State shared across all HTTP handlers. Nothing in here is mutated per
/// request.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Course, conversation and message storage.
    pub store: Arc<SqliteStore>,
    /// Course listing and agent API.
    pub upstream: Arc<UpstreamClient>,
    /// Resolves request headers to a signed-in user.
    pub sessions: Arc<dyn SessionProvider>,
}

impl AppState {
    pub fn new(config: Config, store: SqliteStore) -> Result<Self, ServerError> {
        let store = Arc::new(store);
        let upstream = UpstreamClient::new(&config.agent_base_url, config.upstream_timeout)?;
        let sessions: Arc<dyn SessionProvider> = match config.auth_mode {
            AuthMode::Store => Arc::new(StoreSessionProvider::new(store.clone())),
            AuthMode::Remote => Arc::new(RemoteSessionProvider::new(
                &config.auth_base_url,
                config.upstream_timeout,
            )?),
        };
        Ok(Self {
            config: Arc::new(config),
            store,
            upstream: Arc::new(upstream),
            sessions,
        })
    }
}

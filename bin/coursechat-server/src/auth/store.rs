use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::Utc;
use tracing::debug;

use crate::auth::{session_token, AuthSession, SessionProvider};
use crate::entities::{SessionStore, SqliteStore};
use crate::error::ServerError;

/// Resolves sessions against the shared `session` table.
#[derive(Debug, Clone)]
pub struct StoreSessionProvider {
    store: Arc<SqliteStore>,
}

impl StoreSessionProvider {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionProvider for StoreSessionProvider {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<AuthSession>, ServerError> {
        let Some(token) = session_token(headers) else {
            return Ok(None);
        };
        let Some((session, user)) = self.store.find_session_by_token(&token).await? else {
            debug!("unknown session token");
            return Ok(None);
        };
        if session.is_expired(Utc::now()) {
            debug!(session_id = %session.id, "session expired");
            return Ok(None);
        }
        Ok(Some(AuthSession::from((session, user))))
    }

    async fn revoke(&self, headers: &HeaderMap) -> Result<(), ServerError> {
        if let Some(token) = session_token(headers) {
            let removed = self.store.delete_session_by_token(&token).await?;
            debug!(removed, "session revoked");
        }
        Ok(())
    }
}

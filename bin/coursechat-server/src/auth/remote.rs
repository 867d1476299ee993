use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::Utc;
use tracing::debug;

use crate::auth::{AuthSession, SessionProvider};
use crate::error::ServerError;

/// Asks the auth provider's HTTP API for the caller's session.
///
/// Only the `cookie` and `authorization` headers are forwarded.
#[derive(Debug, Clone)]
pub struct RemoteSessionProvider {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteSessionProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Internal(format!("failed to build auth client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn forward(&self, req: reqwest::RequestBuilder, headers: &HeaderMap) -> reqwest::RequestBuilder {
        let mut req = req;
        for name in [header::COOKIE, header::AUTHORIZATION] {
            for value in headers.get_all(&name) {
                if let Ok(v) = value.to_str() {
                    req = req.header(name.as_str(), v);
                }
            }
        }
        req
    }
}

#[async_trait]
impl SessionProvider for RemoteSessionProvider {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<AuthSession>, ServerError> {
        let url = format!("{}/api/auth/get-session", self.base_url);
        let session: Option<AuthSession> = self
            .forward(self.http.get(&url), headers)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(session.filter(|s| {
            let live = !s.is_expired(Utc::now());
            if !live {
                debug!(session_id = %s.session.id, "provider returned an expired session");
            }
            live
        }))
    }

    async fn revoke(&self, headers: &HeaderMap) -> Result<(), ServerError> {
        let url = format!("{}/api/auth/sign-out", self.base_url);
        self.forward(self.http.post(&url), headers)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutil::spawn_upstream;
    use axum::http::HeaderValue;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn get_session(headers: HeaderMap) -> Json<Value> {
        let cookie = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or("");
        if cookie.contains("better-auth.session_token=good") {
            Json(json!({
                "session": { "id": "s1", "userId": "u1", "token": "good",
                             "expiresAt": "2999-01-01T00:00:00Z" },
                "user": { "id": "u1", "name": "Ada", "email": "ada@example.edu",
                          "emailVerified": true, "image": null }
            }))
        } else if cookie.contains("better-auth.session_token=stale") {
            Json(json!({
                "session": { "id": "s2", "userId": "u1", "token": "stale",
                             "expiresAt": "2000-01-01T00:00:00Z" },
                "user": { "id": "u1", "name": "Ada", "email": "ada@example.edu" }
            }))
        } else {
            Json(Value::Null)
        }
    }

    fn cookie(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        h
    }

    #[tokio::test]
    async fn resolves_via_provider_api() {
        let base = spawn_upstream(
            Router::new()
                .route("/api/auth/get-session", get(get_session))
                .route("/api/auth/sign-out", post(|| async { Json(json!({ "success": true })) })),
        )
        .await;
        let provider = RemoteSessionProvider::new(&base, Duration::from_secs(5)).unwrap();

        let session = provider
            .resolve(&cookie("better-auth.session_token=good.sig"))
            .await
            .unwrap()
            .expect("session");
        assert_eq!(session.user.email, "ada@example.edu");

        assert!(provider.resolve(&cookie("better-auth.session_token=stale")).await.unwrap().is_none());
        assert!(provider.resolve(&HeaderMap::new()).await.unwrap().is_none());
        provider.revoke(&cookie("better-auth.session_token=good")).await.unwrap();
    }

    #[tokio::test]
    async fn provider_failure_is_an_upstream_error() {
        let base = spawn_upstream(Router::new()).await;
        let provider = RemoteSessionProvider::new(&base, Duration::from_secs(5)).unwrap();
        let err = provider.resolve(&HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, ServerError::Upstream(_)));
    }
}

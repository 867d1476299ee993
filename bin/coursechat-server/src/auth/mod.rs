//! Session resolution at the trust boundary.
//!
//! The auth provider owns sign-in; this module only turns an incoming
//! request's headers into a closed [`AuthSession`] record (or nothing).
//! Handlers never see provider-shaped JSON.

pub mod remote;
pub mod store;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{SessionRecord, UserRecord};
use crate::error::ServerError;

pub use remote::RemoteSessionProvider;
pub use store::StoreSessionProvider;

/// Cookie names the auth provider issues; the `__Secure-` variant is used
/// over HTTPS.
pub const SESSION_COOKIES: [&str; 2] = ["better-auth.session_token", "__Secure-better-auth.session_token"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing)]
    pub token: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A validated session and its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthSession {
    pub session: SessionInfo,
    pub user: UserInfo,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.session.expires_at <= now
    }
}

impl From<(SessionRecord, UserRecord)> for AuthSession {
    fn from((session, user): (SessionRecord, UserRecord)) -> Self {
        Self {
            session: SessionInfo {
                id: session.id,
                user_id: session.user_id,
                expires_at: session.expires_at,
                token: session.token,
                ip_address: session.ip_address,
                user_agent: session.user_agent,
                created_at: Some(session.created_at),
                updated_at: Some(session.updated_at),
            },
            user: UserInfo {
                id: user.id,
                name: user.name,
                email: user.email,
                email_verified: user.email_verified,
                image: user.image,
                created_at: Some(user.created_at),
                updated_at: Some(user.updated_at),
            },
        }
    }
}

/// Resolves request headers to the caller's session.
#[async_trait]
pub trait SessionProvider: Send + Sync + std::fmt::Debug + 'static {
    /// `Ok(None)` means "not signed in"; errors are infrastructure failures.
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<AuthSession>, ServerError>;

    /// End the session carried by `headers`, if any.
    async fn revoke(&self, headers: &HeaderMap) -> Result<(), ServerError>;
}

/// Extract the opaque session token from the request.
///
/// Accepts `Authorization: Bearer <token>` or the provider's session cookie.
/// Signed cookie values look like `<token>.<signature>`; only the token part
/// is returned.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| SESSION_COOKIES.contains(name))
        .map(|(_, value)| value.split('.').next().unwrap_or(value).to_owned())
        .filter(|t| !t.is_empty())
}

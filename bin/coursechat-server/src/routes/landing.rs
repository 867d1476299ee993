//! Landing page and sign-out.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::info;
use utoipa::OpenApi;

use crate::auth::{AuthSession, SESSION_COOKIES};
use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(landing, logout), components(schemas(AuthSession)))]
pub struct LandingApi;

/// Public routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(landing))
}

/// Routes that need a session.
pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/logout", post(logout))
}

/// The caller's session, or `null` when signed out.
#[utoipa::path(
    get,
    path = "/",
    tag = "session",
    responses(
        (status = 200, description = "Current session, or null when signed out", body = AuthSession),
    )
)]
pub async fn landing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Option<AuthSession>>, ServerError> {
    Ok(Json(state.sessions.resolve(&headers).await?))
}

/// End the caller's session and clear the session cookies.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "session",
    responses(
        (status = 200, description = "Signed out"),
        (status = 303, description = "Not signed in; redirected to /"),
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    state.sessions.revoke(&headers).await?;
    info!("session revoked");
    let cleared = SESSION_COOKIES.map(|name| {
        (
            header::SET_COOKIE,
            format!("{name}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
        )
    });
    Ok((AppendHeaders(cleared), Json(json!({ "success": true }))))
}

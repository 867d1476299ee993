use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::state::AppState;

/// Where unauthenticated callers are sent.
pub const LANDING_PATH: &str = "/";

/// Gate a route on a signed-in user.
///
/// On success the resolved [`AuthSession`](crate::auth::AuthSession) is
/// stored in the request extensions for handlers to extract; otherwise the
/// caller is redirected to the landing page.
pub async fn require_session(State(state): State<Arc<AppState>>, mut req: Request, next: Next) -> Response {
    match state.sessions.resolve(req.headers()).await {
        Ok(Some(session)) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Ok(None) => {
            debug!(path = %req.uri().path(), "no session; redirecting to landing");
            Redirect::to(LANDING_PATH).into_response()
        }
        Err(e) => e.into_response(),
    }
}

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ServerError;
use crate::state::AppState;

/// Reject state-changing requests whose `Origin` is missing or not trusted.
pub async fn check_origin(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let trusted = &state.config.trusted_origins;
    let safe = [Method::GET, Method::HEAD, Method::OPTIONS];
    if safe.contains(req.method()) {
        return next.run(req).await;
    }

    let origin = req.headers().get(header::ORIGIN).and_then(|v| v.to_str().ok());
    match origin {
        Some(o) if trusted.iter().any(|t| t == o) => next.run(req).await,
        other => {
            warn!(origin = ?other, method = %req.method(), path = %req.uri().path(), "rejected untrusted origin");
            ServerError::Forbidden("invalid origin".into()).into_response()
        }
    }
}

//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (trace id, CORS, origin check)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `COURSECHAT_ENABLE_SWAGGER=false`)
//! - Public routes: landing page and health
//! - Session-gated routes: chat, courses, logout

mod chat;
mod courses;
pub mod doc;
mod health;
mod landing;

use std::sync::Arc;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{auth, cors, origin, trace};
use crate::state::AppState;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let public = Router::new().merge(health::router()).merge(landing::router());

    let protected = Router::new()
        .merge(chat::router())
        .merge(courses::router())
        .merge(landing::protected_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let mut app = Router::new().merge(public).merge(protected);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(middleware::from_fn_with_state(state.clone(), origin::check_origin))
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

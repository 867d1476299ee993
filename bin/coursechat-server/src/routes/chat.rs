//! Chat page routes.
//!
//! `GET /chat` is the page load: it syncs the caller's courses from the
//! course listing service and returns recent history grouped by
//! conversation. `POST /chat/query` is the form action that talks to the
//! agent and records both sides of the exchange.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json, Router};
use tracing::warn;
use utoipa::OpenApi;

use crate::auth::AuthSession;
use crate::entities::{ConversationStore, MessageStore};
use crate::error::ServerError;
use crate::schemas::chat::{
    ChatPageData, ChatQueryForm, ChatQueryResponse, ConversationHistory, CourseView, HistoryEntry,
    FORM_TOO_LARGE, MAX_FORM_BYTES,
};
use crate::services::chat::{load_chat_page, submit_query};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(chat_page, chat_query, conversation_messages),
    components(schemas(
        ChatPageData,
        ChatQueryForm,
        ChatQueryResponse,
        ConversationHistory,
        CourseView,
        HistoryEntry
    ))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", get(chat_page))
        .route(
            "/chat/query",
            post(chat_query).layer(DefaultBodyLimit::max(MAX_FORM_BYTES)),
        )
        .route("/chat/conversations/{id}/messages", get(conversation_messages))
}

#[utoipa::path(
    get,
    path = "/chat",
    tag = "chat",
    responses(
        (status = 200, description = "Courses and recent conversations", body = ChatPageData),
        (status = 303, description = "Not signed in; redirected to /"),
        (status = 502, description = "Course listing service failed"),
    )
)]
pub async fn chat_page(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Json<ChatPageData>, ServerError> {
    Ok(Json(load_chat_page(&state, &auth).await?))
}

#[utoipa::path(
    post,
    path = "/chat/query",
    tag = "chat",
    request_body(content = ChatQueryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Agent reply, or success=false for an invalid form", body = ChatQueryResponse),
        (status = 303, description = "Not signed in; redirected to /"),
        (status = 404, description = "Unknown conversation or course"),
        (status = 502, description = "Agent service failed"),
    )
)]
pub async fn chat_query(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    form: Result<Form<ChatQueryForm>, FormRejection>,
) -> Result<Response, ServerError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(limit = MAX_FORM_BYTES, "chat form body over limit");
            return Ok(Json(ChatQueryResponse::failure(FORM_TOO_LARGE)).into_response());
        }
        Err(rejection) => return Ok(rejection.into_response()),
    };
    Ok(Json(submit_query(&state, &auth, form).await?).into_response())
}

#[utoipa::path(
    get,
    path = "/chat/conversations/{id}/messages",
    tag = "chat",
    params(("id" = String, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Whole transcript, oldest first", body = Vec<HistoryEntry>),
        (status = 404, description = "Unknown conversation"),
    )
)]
pub async fn conversation_messages(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ServerError> {
    state
        .store
        .get_conversation(&id)
        .await?
        .filter(|c| c.user_id == auth.user.id)
        .ok_or_else(|| ServerError::NotFound(format!("conversation '{id}' not found")))?;
    let messages = state.store.list_messages(&id).await?;
    Ok(Json(messages.into_iter().map(HistoryEntry::from).collect()))
}

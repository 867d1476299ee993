//! Course management for the signed-in user.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Extension, Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::auth::AuthSession;
use crate::entities::CourseStore;
use crate::error::ServerError;
use crate::schemas::course::CourseResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(list_courses, delete_course), components(schemas(CourseResponse)))]
pub struct CoursesApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/{id}", delete(delete_course))
}

#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    responses(
        (status = 200, description = "Courses owned by the caller", body = Vec<CourseResponse>),
    )
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
) -> Result<Json<Vec<CourseResponse>>, ServerError> {
    let courses = state.store.list_courses_for_user(&auth.user.id).await?;
    Ok(Json(courses.iter().map(|c| c.to_response()).collect()))
}

/// Delete a course together with its conversations and messages.
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "courses",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = serde_json::Value),
        (status = 404, description = "Unknown course"),
    )
)]
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state
        .store
        .get_course(&id)
        .await?
        .filter(|c| c.user_id.as_deref() == Some(auth.user.id.as_str()))
        .ok_or_else(|| ServerError::NotFound(format!("course '{id}' not found")))?;
    state.store.delete_course(&id).await?;
    info!(course_id = %id, "course deleted");
    Ok(Json(serde_json::json!({ "deleted": true })))
}

use crate::routes::{chat, courses, health, landing};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "coursechat-server",
    description = "Course assistant chat API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(landing::LandingApi::openapi());
    root.merge(chat::ChatApi::openapi());
    root.merge(courses::CoursesApi::openapi());
    root
}

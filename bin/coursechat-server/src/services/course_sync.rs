//! Mirrors the external course list into the `course` table.
//!
//! Rows are matched on the learning-platform id only. Existing rows are
//! never updated, so a course renamed upstream keeps its stored name.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{CourseRecord, CourseStore};
use crate::schemas::upstream::ExternalCourse;

#[derive(Debug, Clone)]
pub struct CourseSyncOutcome {
    /// The external list, unchanged.
    pub courses: Vec<ExternalCourse>,
    /// How many rows this run created.
    pub inserted: usize,
}

/// Insert a row owned by `owner_id` for every course not stored yet.
pub async fn sync_courses<S: CourseStore>(
    store: &S,
    owner_id: &str,
    courses: Vec<ExternalCourse>,
) -> Result<CourseSyncOutcome, sqlx::Error> {
    let mut inserted = 0;
    for external in &courses {
        if store.find_course_by_canvas_id(&external.id).await?.is_some() {
            continue;
        }
        let now = Utc::now();
        let record = CourseRecord {
            id: Uuid::new_v4().to_string(),
            canvas_id: external.id.clone(),
            name: external.name.clone(),
            discord_server_id: None,
            discord_channel_id: None,
            slack_workspace: None,
            user_id: Some(owner_id.to_owned()),
            created_at: now,
            updated_at: now,
        };
        // A concurrent sync may have won the race; the unique key decides.
        if store.insert_course_if_absent(&record).await? {
            debug!(canvas_id = %record.canvas_id, course_id = %record.id, "course stored");
            inserted += 1;
        }
    }
    if inserted > 0 {
        info!(owner_id, inserted, total = courses.len(), "course sync inserted new rows");
    }
    Ok(CourseSyncOutcome { courses, inserted })
}

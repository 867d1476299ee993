use chrono::{DateTime, Utc};

/// A row in the `course` table.
///
/// `canvas_id` is the natural key: the learning platform's identifier for
/// the course. At most one row exists per `canvas_id`.
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: String,
    pub canvas_id: String,
    pub name: String,
    pub discord_server_id: Option<String>,
    pub discord_channel_id: Option<String>,
    pub slack_workspace: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

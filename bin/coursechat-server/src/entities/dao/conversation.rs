use chrono::{DateTime, Utc};

/// A row in the `conversation` table.
#[derive(Debug, Clone)]
pub struct ConversationRecord {
    pub id: String,
    pub course_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

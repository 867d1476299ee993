use crate::entities::{dao::ConversationRecord, format_ts, parse_ts, SqliteStore};
use chrono::{DateTime, Utc};
use std::future::Future;

pub trait ConversationStore: Send + Sync + 'static {
    fn create_conversation(&self, convo: ConversationRecord) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    fn get_conversation(&self, id: &str) -> impl Future<Output = Result<Option<ConversationRecord>, sqlx::Error>> + Send;
    fn touch_conversation(&self, id: &str, at: DateTime<Utc>) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
}

impl ConversationStore for SqliteStore {
    async fn create_conversation(&self, convo: ConversationRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO conversation (id, course_id, user_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&convo.id)
        .bind(&convo.course_id)
        .bind(&convo.user_id)
        .bind(format_ts(convo.created_at))
        .bind(format_ts(convo.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<ConversationRecord>, sqlx::Error> {
        let row: Option<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, course_id, user_id, created_at, updated_at \
             FROM conversation WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, course_id, user_id, created_at, updated_at)| ConversationRecord {
            id,
            course_id,
            user_id,
            created_at: parse_ts(&created_at, "conversation.created_at"),
            updated_at: parse_ts(&updated_at, "conversation.updated_at"),
        }))
    }

    async fn touch_conversation(&self, id: &str, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE conversation SET updated_at = ?1 WHERE id = ?2")
            .bind(format_ts(at))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

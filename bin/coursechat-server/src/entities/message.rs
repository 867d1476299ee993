use crate::entities::{dao::MessageRecord, format_ts, parse_ts, MessageRole, SqliteStore};
use std::future::Future;

pub trait MessageStore: Send + Sync + 'static {
    fn append_message(&self, msg: MessageRecord) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    /// Every message of one conversation, oldest first.
    fn list_messages(
        &self,
        conversation_id: &str,
    ) -> impl Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;
    /// The `limit` newest messages across all of a user's conversations,
    /// newest first.
    fn recent_messages_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<MessageRecord>, sqlx::Error>> + Send;
}

type MessageRow = (String, String, String, String, String);

fn message_from_row(row: MessageRow) -> MessageRecord {
    let (id, conversation_id, role, content, created_at) = row;
    let role = role.parse().unwrap_or_else(|e: String| {
        tracing::warn!(message_id = %id, error = %e, "unexpected role in message row; treating as agent");
        MessageRole::Agent
    });
    MessageRecord {
        id,
        conversation_id,
        role,
        content,
        created_at: parse_ts(&created_at, "message.created_at"),
    }
}

impl MessageStore for SqliteStore {
    async fn append_message(&self, msg: MessageRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO message (id, conversation_id, role, content, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&msg.id)
        .bind(&msg.conversation_id)
        .bind(msg.role.as_str())
        .bind(&msg.content)
        .bind(format_ts(msg.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<MessageRecord>, sqlx::Error> {
        // rowid breaks ties between rows written within the same microsecond.
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, conversation_id, role, content, created_at \
             FROM message WHERE conversation_id = ?1 \
             ORDER BY created_at ASC, rowid ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(message_from_row).collect())
    }

    async fn recent_messages_for_user(&self, user_id: &str, limit: u32) -> Result<Vec<MessageRecord>, sqlx::Error> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT m.id, m.conversation_id, m.role, m.content, m.created_at \
             FROM message m JOIN conversation c ON c.id = m.conversation_id \
             WHERE c.user_id = ?1 \
             ORDER BY m.created_at DESC, m.rowid DESC \
             LIMIT ?2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(message_from_row).collect())
    }
}

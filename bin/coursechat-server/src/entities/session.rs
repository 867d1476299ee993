use crate::entities::dao::{SessionRecord, UserRecord};
use crate::entities::user::{user_from_row, UserRow};
use crate::entities::{format_ts, parse_ts, SqliteStore};
use chrono::{DateTime, Utc};
use std::future::Future;

pub trait SessionStore: Send + Sync + 'static {
    /// Sessions are issued by the auth provider; only tests write them here.
    #[cfg(test)]
    fn insert_session(&self, session: SessionRecord) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    /// Look a session up by its opaque token, together with its owner.
    fn find_session_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<(SessionRecord, UserRecord)>, sqlx::Error>> + Send;
    fn delete_session_by_token(&self, token: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    fn delete_expired_sessions(&self, now: DateTime<Utc>) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

type SessionUserRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
    bool,
    Option<String>,
    String,
    String,
);

impl SessionStore for SqliteStore {
    #[cfg(test)]
    async fn insert_session(&self, session: SessionRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO session (id, expires_at, token, created_at, updated_at, ip_address, user_agent, user_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&session.id)
        .bind(format_ts(session.expires_at))
        .bind(&session.token)
        .bind(format_ts(session.created_at))
        .bind(format_ts(session.updated_at))
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .bind(&session.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_session_by_token(
        &self,
        token: &str,
    ) -> Result<Option<(SessionRecord, UserRecord)>, sqlx::Error> {
        let row: Option<SessionUserRow> = sqlx::query_as(
            "SELECT s.id, s.token, s.user_id, s.expires_at, s.ip_address, s.user_agent, \
                    s.created_at, s.updated_at, \
                    u.id, u.name, u.email, u.email_verified, u.image, u.created_at, u.updated_at \
             FROM session s JOIN \"user\" u ON u.id = s.user_id \
             WHERE s.token = ?1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(
                id,
                token,
                user_id,
                expires_at,
                ip_address,
                user_agent,
                created_at,
                updated_at,
                u_id,
                u_name,
                u_email,
                u_verified,
                u_image,
                u_created,
                u_updated,
            )| {
                let session = SessionRecord {
                    id,
                    token,
                    user_id,
                    expires_at: parse_ts(&expires_at, "session.expires_at"),
                    ip_address,
                    user_agent,
                    created_at: parse_ts(&created_at, "session.created_at"),
                    updated_at: parse_ts(&updated_at, "session.updated_at"),
                };
                let user: UserRow = (u_id, u_name, u_email, u_verified, u_image, u_created, u_updated);
                (session, user_from_row(user))
            },
        ))
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM session WHERE token = ?1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM session WHERE expires_at <= ?1")
            .bind(format_ts(now))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

//! Database abstraction layer.
//!
//! One trait per aggregate (`UserStore`, [`SessionStore`], [`CourseStore`],
//! [`ConversationStore`], [`MessageStore`]), all implemented for
//! [`SqliteStore`]. Handlers only ever talk to the traits.
//!
//! All trait methods use `impl Future` in their signatures so no extra
//! `async-trait` crate is required.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that `ORDER BY created_at` is chronological.

pub mod conversation;
pub mod course;
pub mod dao;
pub mod message;
pub mod session;
pub mod user;

pub use dao::{ConversationRecord, CourseRecord, MessageRecord, MessageRole, SessionRecord, UserRecord};

pub use conversation::ConversationStore;
pub use course::CourseStore;
pub use message::MessageStore;
pub use session::SessionStore;
#[cfg(test)]
pub use user::UserStore;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://coursechat.db?mode=rwc"` or `"sqlite::memory:"` for tests.
    /// Foreign keys are always enforced; cascade deletes depend on it.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .foreign_keys(true)
            .create_if_missing(true);

        // Every connection to `:memory:` is its own database.
        let max_connections = if url.contains(":memory:") { 1 } else { 8 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Round-trip a trivial query to prove the pool can reach the database.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(raw: &str, column: &'static str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(raw = %raw, column, error = %e, "failed to parse timestamp; using now");
            Utc::now()
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    pub async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:")
            .await
            .expect("in-memory store should open")
    }

    /// Close every pooled connection so later queries fail.
    pub async fn close_store(store: &SqliteStore) {
        store.pool.close().await;
    }

    pub async fn seed_user(store: &SqliteStore, email: &str) -> UserRecord {
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: email.split('@').next().unwrap_or(email).to_owned(),
            email: email.to_owned(),
            email_verified: true,
            image: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(user.clone()).await.expect("insert user");
        user
    }

    pub async fn seed_session(store: &SqliteStore, user: &UserRecord, token: &str) -> SessionRecord {
        let now = Utc::now();
        let session = SessionRecord {
            id: Uuid::new_v4().to_string(),
            token: token.to_owned(),
            user_id: user.id.clone(),
            expires_at: now + Duration::days(7),
            ip_address: None,
            user_agent: Some("test-agent".into()),
            created_at: now,
            updated_at: now,
        };
        store.insert_session(session.clone()).await.expect("insert session");
        session
    }

    pub async fn seed_course(store: &SqliteStore, owner: &UserRecord, canvas_id: &str) -> CourseRecord {
        let now = Utc::now();
        let course = CourseRecord {
            id: Uuid::new_v4().to_string(),
            canvas_id: canvas_id.to_owned(),
            name: format!("Course {canvas_id}"),
            discord_server_id: None,
            discord_channel_id: None,
            slack_workspace: None,
            user_id: Some(owner.id.clone()),
            created_at: now,
            updated_at: now,
        };
        store.insert_course_if_absent(&course).await.expect("insert course");
        course
    }

    pub async fn seed_conversation(
        store: &SqliteStore,
        course: &CourseRecord,
        owner: &UserRecord,
    ) -> ConversationRecord {
        let now = Utc::now();
        let convo = ConversationRecord {
            id: Uuid::new_v4().to_string(),
            course_id: course.id.clone(),
            user_id: owner.id.clone(),
            created_at: now,
            updated_at: now,
        };
        store.create_conversation(convo.clone()).await.expect("insert conversation");
        convo
    }

    pub async fn seed_message(
        store: &SqliteStore,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> MessageRecord {
        let msg = MessageRecord {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_owned(),
            role,
            content: content.to_owned(),
            created_at,
        };
        store.append_message(msg.clone()).await.expect("insert message");
        msg
    }
}

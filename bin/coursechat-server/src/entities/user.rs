use crate::entities::{dao::UserRecord, parse_ts};
#[cfg(test)]
use crate::entities::{format_ts, SqliteStore};
#[cfg(test)]
use std::future::Future;

/// User rows are written by the auth provider; the server itself only reads
/// them through the session join, so this store exists for tests.
#[cfg(test)]
pub trait UserStore: Send + Sync + 'static {
    fn insert_user(&self, user: UserRecord) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    fn get_user(&self, id: &str) -> impl Future<Output = Result<Option<UserRecord>, sqlx::Error>> + Send;
    fn delete_user(&self, id: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

pub(crate) type UserRow = (String, String, String, bool, Option<String>, String, String);

pub(crate) fn user_from_row(row: UserRow) -> UserRecord {
    let (id, name, email, email_verified, image, created_at, updated_at) = row;
    UserRecord {
        id,
        name,
        email,
        email_verified,
        image,
        created_at: parse_ts(&created_at, "user.created_at"),
        updated_at: parse_ts(&updated_at, "user.updated_at"),
    }
}

#[cfg(test)]
impl UserStore for SqliteStore {
    async fn insert_user(&self, user: UserRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO \"user\" (id, name, email, email_verified, image, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.email_verified)
        .bind(&user.image)
        .bind(format_ts(user.created_at))
        .bind(format_ts(user.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, name, email, email_verified, image, created_at, updated_at \
             FROM \"user\" WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(user_from_row))
    }

    async fn delete_user(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM \"user\" WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::fixtures::*;
    use crate::entities::SessionStore;

    #[tokio::test]
    async fn user_roundtrips_through_store() {
        let store = memory_store().await;
        let user = seed_user(&store, "ada@example.edu").await;
        let loaded = store.get_user(&user.id).await.unwrap().expect("user exists");
        assert_eq!(loaded.email, "ada@example.edu");
        assert!(loaded.email_verified);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = memory_store().await;
        let first = seed_user(&store, "dup@example.edu").await;
        let mut second = first.clone();
        second.id = "another-id".into();
        assert!(store.insert_user(second).await.is_err());
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_sessions() {
        let store = memory_store().await;
        let user = seed_user(&store, "gone@example.edu").await;
        seed_session(&store, &user, "tok-gone").await;

        assert!(store.delete_user(&user.id).await.unwrap());
        assert!(store.find_session_by_token("tok-gone").await.unwrap().is_none());
    }
}

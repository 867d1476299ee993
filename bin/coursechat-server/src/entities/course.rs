use crate::entities::{dao::CourseRecord, format_ts, parse_ts, SqliteStore};
use std::future::Future;

pub trait CourseStore: Send + Sync + 'static {
    fn find_course_by_canvas_id(
        &self,
        canvas_id: &str,
    ) -> impl Future<Output = Result<Option<CourseRecord>, sqlx::Error>> + Send;
    /// Insert `course` unless a row with the same `canvas_id` exists.
    /// Returns `true` when a row was written.
    fn insert_course_if_absent(&self, course: &CourseRecord) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    fn get_course(&self, id: &str) -> impl Future<Output = Result<Option<CourseRecord>, sqlx::Error>> + Send;
    fn list_courses_for_user(&self, user_id: &str) -> impl Future<Output = Result<Vec<CourseRecord>, sqlx::Error>> + Send;
    /// Delete a course; its conversations and messages go with it.
    fn delete_course(&self, id: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

type CourseRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
);

const COURSE_COLUMNS: &str = "id, canvas_id, name, discord_server_id, discord_channel_id, \
                              slack_workspace, user_id, created_at, updated_at";

fn course_from_row(row: CourseRow) -> CourseRecord {
    let (
        id,
        canvas_id,
        name,
        discord_server_id,
        discord_channel_id,
        slack_workspace,
        user_id,
        created_at,
        updated_at,
    ) = row;
    CourseRecord {
        id,
        canvas_id,
        name,
        discord_server_id,
        discord_channel_id,
        slack_workspace,
        user_id,
        created_at: parse_ts(&created_at, "course.created_at"),
        updated_at: parse_ts(&updated_at, "course.updated_at"),
    }
}

impl CourseStore for SqliteStore {
    async fn find_course_by_canvas_id(&self, canvas_id: &str) -> Result<Option<CourseRecord>, sqlx::Error> {
        let row: Option<CourseRow> =
            sqlx::query_as(&format!("SELECT {COURSE_COLUMNS} FROM course WHERE canvas_id = ?1"))
                .bind(canvas_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(course_from_row))
    }

    async fn insert_course_if_absent(&self, course: &CourseRecord) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO course (id, canvas_id, name, discord_server_id, discord_channel_id, \
                                 slack_workspace, user_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             ON CONFLICT(canvas_id) DO NOTHING",
        )
        .bind(&course.id)
        .bind(&course.canvas_id)
        .bind(&course.name)
        .bind(&course.discord_server_id)
        .bind(&course.discord_channel_id)
        .bind(&course.slack_workspace)
        .bind(&course.user_id)
        .bind(format_ts(course.created_at))
        .bind(format_ts(course.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_course(&self, id: &str) -> Result<Option<CourseRecord>, sqlx::Error> {
        let row: Option<CourseRow> = sqlx::query_as(&format!("SELECT {COURSE_COLUMNS} FROM course WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(course_from_row))
    }

    async fn list_courses_for_user(&self, user_id: &str) -> Result<Vec<CourseRecord>, sqlx::Error> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "SELECT {COURSE_COLUMNS} FROM course WHERE user_id = ?1 ORDER BY name ASC, canvas_id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(course_from_row).collect())
    }

    async fn delete_course(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM course WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

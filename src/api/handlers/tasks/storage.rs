//! Task persistence.
//!
//! List and insert are always owner-scoped. Update and delete operate on the
//! task id alone; the caller owns the authorization decision.

use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use super::types::{Task, UpdateTaskRequest};

const TASK_COLUMNS: &str = r#"
    id::text AS id,
    title,
    description,
    is_complete,
    user_id::text AS user_id,
    to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
    to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
"#;

fn task_from_row(row: &PgRow) -> Task {
    Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        is_complete: row.get("is_complete"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// All tasks owned by `owner_id`, in insertion order.
pub(super) async fn fetch_tasks(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    let query = format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at, id"
    );
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query.as_str()
    );
    let rows = sqlx::query(&query)
        .bind(owner_id)
        .fetch_all(pool)
        .instrument(span)
        .await?;

    Ok(rows.iter().map(task_from_row).collect())
}

pub(super) async fn insert_task(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    description: Option<&str>,
) -> Result<Task, sqlx::Error> {
    let query = format!(
        "INSERT INTO tasks (title, description, user_id) VALUES ($1, $2, $3) RETURNING {TASK_COLUMNS}"
    );
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(title)
        .bind(description)
        .bind(owner_id)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(task_from_row(&row))
}

/// Partial update by id. Returns `None` when no row matches.
pub(super) async fn update_task(
    pool: &PgPool,
    task_id: Uuid,
    patch: &UpdateTaskRequest,
) -> Result<Option<Task>, sqlx::Error> {
    let query = format!(
        r"UPDATE tasks SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            is_complete = COALESCE($3, is_complete),
            updated_at = NOW()
        WHERE id = $4
        RETURNING {TASK_COLUMNS}"
    );
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.is_complete)
        .bind(task_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.as_ref().map(task_from_row))
}

/// Delete by id, returning the removed row. `None` when no row matches.
pub(super) async fn delete_task(
    pool: &PgPool,
    task_id: Uuid,
) -> Result<Option<Task>, sqlx::Error> {
    let query = format!("DELETE FROM tasks WHERE id = $1 RETURNING {TASK_COLUMNS}");
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query.as_str()
    );
    let row = sqlx::query(&query)
        .bind(task_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.as_ref().map(task_from_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
    use std::time::Duration;

    fn unreachable_pool() -> PgPool {
        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("invalid")
            .database("invalid")
            .ssl_mode(PgSslMode::Disable);
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options)
    }

    #[tokio::test]
    async fn fetch_tasks_surfaces_db_failure() {
        let pool = unreachable_pool();
        assert!(fetch_tasks(&pool, Uuid::new_v4()).await.is_err());
    }

    #[tokio::test]
    async fn insert_task_surfaces_db_failure() {
        let pool = unreachable_pool();
        assert!(insert_task(&pool, Uuid::new_v4(), "Buy milk", None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn update_task_surfaces_db_failure() {
        let pool = unreachable_pool();
        let patch = UpdateTaskRequest {
            is_complete: Some(true),
            ..UpdateTaskRequest::default()
        };
        assert!(update_task(&pool, Uuid::new_v4(), &patch).await.is_err());
    }

    #[tokio::test]
    async fn delete_task_surfaces_db_failure() {
        let pool = unreachable_pool();
        assert!(delete_task(&pool, Uuid::new_v4()).await.is_err());
    }
}

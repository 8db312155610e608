//! User persistence. Raw queries against the `users` table; every statement
//! runs inside a `db.query` span.

use sqlx::{PgPool, Row};
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub(crate) struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Identity projection used by the request gate: id and username only.
pub(crate) struct UserIdentity {
    pub id: Uuid,
    pub username: String,
}

/// Exact, case-sensitive username lookup.
pub(super) async fn lookup_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let query = "SELECT id, username, password_hash FROM users WHERE username = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    }))
}

pub(super) async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<Uuid, sqlx::Error> {
    let query = "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await?;

    Ok(row.get("id"))
}

/// Resolve a verified token subject to a live user row. `None` means the user
/// no longer exists and the credential must be rejected.
pub(crate) async fn lookup_user_identity(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserIdentity>, sqlx::Error> {
    let query = "SELECT id, username FROM users WHERE id = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await?;

    Ok(row.map(|row| UserIdentity {
        id: row.get("id"),
        username: row.get("username"),
    }))
}

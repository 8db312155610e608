use crate::GIT_COMMIT_HASH;
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgPool};
use tracing::{debug, error, info_span, Instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database connection is healthy", body = Health),
        (status = 503, description = "Database connection is unhealthy", body = Health)
    ),
    tag = "health"
)]
pub async fn health(pool: Extension<PgPool>) -> impl IntoResponse {
    let acquire_span = info_span!(
        "db.acquire",
        db.system = "postgresql",
        db.operation = "ACQUIRE"
    );
    let result = match pool.0.acquire().instrument(acquire_span).await {
        Ok(mut conn) => {
            let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
            match conn.ping().instrument(ping_span).await {
                Ok(()) => Ok(()),
                Err(error) => {
                    error!("Failed to ping database: {}", error);
                    Err(StatusCode::SERVICE_UNAVAILABLE)
                }
            }
        }
        Err(error) => {
            error!("Failed to acquire database connection: {}", error);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if result.is_ok() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    match format!("{}:{}:{}", health.name, health.version, short_hash).parse::<HeaderValue>() {
        Ok(x_app) => {
            debug!("X-App header: {:?}", x_app);
            headers.insert("X-App", x_app);
        }
        Err(err) => {
            error!("Failed to parse X-App header: {}", err);
        }
    }

    let status = match result {
        Ok(()) => {
            debug!("Database connection is healthy");
            StatusCode::OK
        }
        Err(status) => {
            debug!("Database connection is unhealthy");
            status
        }
    };

    (status, headers, Json(health))
}

//! Task CRUD endpoints.
//!
//! Every handler resolves the caller through `require_auth` before touching
//! the store. List and create are scoped to the caller's id. Update and delete
//! address tasks by id alone and do not re-check ownership; any authenticated
//! user can mutate any task id they hold. Path ids must parse as UUIDs before
//! any store round-trip; operations on ids with no row return 400, not 404.

pub(crate) mod storage;
pub mod types;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use self::types::{
    validate_create, validate_update, CreateTaskRequest, Task, UpdateTaskRequest,
};
use super::auth::principal::require_auth;
use super::{error_reply, internal_error, validation_reply, ErrorBody, Reply};
use crate::token::TokenKeys;

#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Tasks owned by the caller", body = [Task]),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody),
    ),
    tag = "tasks"
)]
pub async fn list(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<TokenKeys>>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &keys, &pool).await {
        Ok(principal) => principal,
        Err(reply) => return reply.into_response(),
    };

    match storage::fetch_tasks(&pool, principal.user_id).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(err) => {
            error!("Failed to list tasks: {err}");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody),
    ),
    tag = "tasks"
)]
pub async fn create(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<TokenKeys>>,
    payload: Option<Json<CreateTaskRequest>>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &keys, &pool).await {
        Ok(principal) => principal,
        Err(reply) => return reply.into_response(),
    };

    let request: CreateTaskRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return error_reply(StatusCode::BAD_REQUEST, "Missing payload").into_response();
        }
    };

    let details = validate_create(&request);
    if !details.is_empty() {
        return validation_reply(details).into_response();
    }

    // The owner is the verified caller, never anything from the body.
    match storage::insert_task(
        &pool,
        principal.user_id,
        &request.title,
        request.description.as_deref(),
    )
    .await
    {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(err) => {
            error!("Failed to create task: {err}");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = Task),
        (status = 400, description = "Invalid id, invalid body, or no such task", body = ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody),
    ),
    tag = "tasks"
)]
pub async fn update(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<TokenKeys>>,
    payload: Option<Json<UpdateTaskRequest>>,
) -> impl IntoResponse {
    if let Err(reply) = require_auth(&headers, &keys, &pool).await {
        return reply.into_response();
    }

    let task_id = match parse_task_id(&id) {
        Ok(task_id) => task_id,
        Err(reply) => return reply.into_response(),
    };

    let patch: UpdateTaskRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return error_reply(StatusCode::BAD_REQUEST, "Missing payload").into_response();
        }
    };

    if patch.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "No updates provided").into_response();
    }

    let details = validate_update(&patch);
    if !details.is_empty() {
        return validation_reply(details).into_response();
    }

    match storage::update_task(&pool, task_id, &patch).await {
        Ok(Some(task)) => (StatusCode::OK, Json(task)).into_response(),
        Ok(None) => error_reply(StatusCode::BAD_REQUEST, "Task not found").into_response(),
        Err(err) => {
            error!("Failed to update task: {err}");
            internal_error().into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Deleted task", body = Task),
        (status = 400, description = "Invalid id or no such task", body = ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody),
    ),
    tag = "tasks"
)]
pub async fn remove(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    keys: Extension<Arc<TokenKeys>>,
) -> impl IntoResponse {
    if let Err(reply) = require_auth(&headers, &keys, &pool).await {
        return reply.into_response();
    }

    let task_id = match parse_task_id(&id) {
        Ok(task_id) => task_id,
        Err(reply) => return reply.into_response(),
    };

    match storage::delete_task(&pool, task_id).await {
        Ok(Some(task)) => (StatusCode::OK, Json(task)).into_response(),
        Ok(None) => error_reply(StatusCode::BAD_REQUEST, "Task not found").into_response(),
        Err(err) => {
            error!("Failed to delete task: {err}");
            internal_error().into_response()
        }
    }
}

/// Path ids must be well-formed UUIDs before the store is consulted.
fn parse_task_id(id: &str) -> Result<Uuid, Reply> {
    Uuid::parse_str(id.trim())
        .map_err(|_| error_reply(StatusCode::BAD_REQUEST, "Invalid task id"))
}

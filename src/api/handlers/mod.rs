//! API handlers and shared reply types.
//!
//! Every error the API produces is a JSON object with at least an `error`
//! string; validation failures additionally carry per-field details. Handlers
//! build replies through the helpers here so the shape stays uniform.

pub mod auth;
pub mod health;
pub mod root;
pub mod tasks;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Uniform error reply: a status code plus a JSON `ErrorBody`.
pub(crate) type Reply = (StatusCode, Json<ErrorBody>);

pub(crate) fn error_reply(status: StatusCode, message: impl Into<String>) -> Reply {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
            details: None,
        }),
    )
}

pub(crate) fn validation_reply(details: Vec<FieldError>) -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Validation failed".to_string(),
            details: Some(details),
        }),
    )
}

pub(crate) fn internal_error() -> Reply {
    error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

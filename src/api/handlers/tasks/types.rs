//! Task wire types.
//!
//! The task surface speaks camelCase (`isComplete`, `userId`, ...), so the
//! structs carry a `rename_all` and strict bodies reject unknown fields —
//! including any client-supplied owner, which is never part of the contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::handlers::FieldError;

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_complete: bool,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Partial update; absent fields keep their stored values.
#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_complete: Option<bool>,
}

impl UpdateTaskRequest {
    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.is_complete.is_none()
    }
}

pub(crate) fn validate_create(request: &CreateTaskRequest) -> Vec<FieldError> {
    let mut details = Vec::new();
    if request.title.trim().is_empty() {
        details.push(FieldError::new("title", "must not be empty"));
    }
    details
}

pub(crate) fn validate_update(request: &UpdateTaskRequest) -> Vec<FieldError> {
    let mut details = Vec::new();
    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            details.push(FieldError::new("title", "must not be empty"));
        }
    }
    details
}

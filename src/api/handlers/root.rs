use axum::{http::StatusCode, response::IntoResponse};

use crate::APP_USER_AGENT;

// Undocumented banner route; probes and humans hitting "/" get the app id.
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, APP_USER_AGENT)
}

//! OpenAPI document served at `/docs`.

use utoipa::OpenApi;

use super::handlers::{auth, health, tasks, ErrorBody, FieldError};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        tasks::list,
        tasks::create,
        tasks::update,
        tasks::remove,
    ),
    components(schemas(
        health::Health,
        auth::types::RegisterRequest,
        auth::types::LoginRequest,
        auth::types::AuthResponse,
        tasks::types::Task,
        tasks::types::CreateTaskRequest,
        tasks::types::UpdateTaskRequest,
        ErrorBody,
        FieldError,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "tasks", description = "Per-user task management"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

//! Registration and login.
//!
//! Both endpoints validate their payload against the schema in [`types`],
//! then orchestrate the credential store, the password hasher, and the token
//! signer. Login failures are deliberately indistinguishable between "no such
//! user" and "wrong password".

pub(crate) mod password;
pub mod principal;
pub(crate) mod storage;
pub mod types;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use self::types::{
    validate_login, validate_register, AuthResponse, LoginRequest, RegisterRequest,
};
use super::{error_reply, internal_error, is_unique_violation, validation_reply, ErrorBody};
use crate::token::TokenKeys;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    keys: Extension<Arc<TokenKeys>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return error_reply(StatusCode::BAD_REQUEST, "Missing payload").into_response();
        }
    };

    debug!("register request for username: {}", request.username);

    let details = validate_register(&request);
    if !details.is_empty() {
        return validation_reply(details).into_response();
    }

    // Check first so a taken username never pays for a hash or a write.
    match storage::lookup_user_by_username(&pool, &request.username).await {
        Ok(Some(_)) => {
            return error_reply(StatusCode::CONFLICT, "Username already exists").into_response();
        }
        Ok(None) => {}
        Err(err) => {
            error!("Failed to check username availability: {err}");
            return internal_error().into_response();
        }
    }

    let password_hash = match password::hash_password(request.password.expose_secret()) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return internal_error().into_response();
        }
    };

    let user_id = match storage::insert_user(&pool, &request.username, &password_hash).await {
        Ok(id) => id,
        // A concurrent registration can slip between the lookup and the
        // insert; the unique index turns it into the same conflict.
        Err(err) if is_unique_violation(&err) => {
            return error_reply(StatusCode::CONFLICT, "Username already exists").into_response();
        }
        Err(err) => {
            error!("Failed to insert user: {err}");
            return internal_error().into_response();
        }
    };

    signed_response(StatusCode::CREATED, &keys, user_id, request.username)
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error or invalid credentials", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    keys: Extension<Arc<TokenKeys>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return error_reply(StatusCode::BAD_REQUEST, "Missing payload").into_response();
        }
    };

    let details = validate_login(&request);
    if !details.is_empty() {
        return validation_reply(details).into_response();
    }

    let record = match storage::lookup_user_by_username(&pool, &request.username).await {
        Ok(record) => record,
        Err(err) => {
            error!("Failed to look up user: {err}");
            return internal_error().into_response();
        }
    };

    // Unknown usernames and wrong passwords produce the same reply so the
    // endpoint cannot be used to enumerate accounts.
    let Some(record) = record else {
        return invalid_credentials();
    };

    if !password::verify_password(request.password.expose_secret(), &record.password_hash) {
        return invalid_credentials();
    }

    signed_response(StatusCode::OK, &keys, record.id, record.username)
}

fn invalid_credentials() -> Response {
    error_reply(StatusCode::BAD_REQUEST, "Invalid username or password").into_response()
}

fn signed_response(
    status: StatusCode,
    keys: &TokenKeys,
    user_id: Uuid,
    username: String,
) -> Response {
    match keys.sign(&user_id.to_string(), Utc::now().timestamp()) {
        Ok(token) => (
            status,
            Json(AuthResponse {
                id: user_id.to_string(),
                username,
                token,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to sign identity token: {err}");
            internal_error().into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{test_support, DEFAULT_TOKEN_TTL_SECONDS};

    #[test]
    fn signed_response_embeds_user_id_as_subject() -> anyhow::Result<()> {
        let keys = test_support::keys(DEFAULT_TOKEN_TTL_SECONDS);
        let user_id = Uuid::new_v4();

        let response = signed_response(StatusCode::OK, &keys, user_id, "alice".to_string());
        assert_eq!(response.status(), StatusCode::OK);

        let token = keys.sign(&user_id.to_string(), Utc::now().timestamp())?;
        let claims = keys.verify(&token, Utc::now().timestamp())?;
        assert_eq!(claims.sub, user_id.to_string());
        Ok(())
    }

    #[test]
    fn invalid_credentials_is_a_400() {
        let response = invalid_credentials();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

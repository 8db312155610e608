//! Authenticated principal extraction.
//!
//! This is the single gate in front of every task operation: it reads the
//! bearer credential, verifies it offline against the configured public key,
//! resolves the subject against the credential store, and hands the handler a
//! typed `Principal`. Nothing downstream re-derives identity.

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use super::storage;
use crate::api::handlers::{error_reply, internal_error, Reply};
use crate::token::TokenKeys;

/// Authenticated user context derived from a verified token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
}

/// Resolve the request's bearer credential into a principal.
///
/// Three outcomes: missing header (401, "Authentication required"), failed
/// verification or vanished user (401, "Invalid or expired token" — one
/// message for every failure mode so callers cannot probe which check
/// tripped), or a live principal. Store failures are 500, not 401.
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    keys: &TokenKeys,
    pool: &PgPool,
) -> Result<Principal, Reply> {
    let Some(token) = extract_credential(headers) else {
        return Err(error_reply(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
        ));
    };

    let claims = match keys.verify(&token, Utc::now().timestamp()) {
        Ok(claims) => claims,
        Err(err) => {
            debug!("Token verification failed: {err}");
            return Err(invalid_credential());
        }
    };

    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        debug!("Token subject is not a valid user id");
        return Err(invalid_credential());
    };

    match storage::lookup_user_identity(pool, user_id).await {
        Ok(Some(identity)) => Ok(Principal {
            user_id: identity.id,
            username: identity.username,
        }),
        Ok(None) => {
            debug!("Token subject no longer exists");
            Err(invalid_credential())
        }
        Err(err) => {
            error!("Failed to resolve token subject: {err}");
            Err(internal_error())
        }
    }
}

fn invalid_credential() -> Reply {
    error_reply(StatusCode::UNAUTHORIZED, "Invalid or expired token")
}

/// The whole `Authorization` value is the token; no `Bearer ` prefix is
/// parsed.
fn extract_credential(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
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

    fn test_keys() -> TokenKeys {
        crate::token::test_support::keys(crate::token::DEFAULT_TOKEN_TTL_SECONDS)
    }

    #[test]
    fn extract_credential_takes_whole_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("raw-token-value"));
        assert_eq!(
            extract_credential(&headers),
            Some("raw-token-value".to_string())
        );
    }

    #[test]
    fn extract_credential_keeps_bearer_prefix_as_part_of_the_token() {
        // The contract is the raw header value; a "Bearer " prefix is not
        // stripped and would simply fail verification.
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_credential(&headers), Some("Bearer abc".to_string()));
    }

    #[test]
    fn extract_credential_rejects_missing_or_blank() {
        let headers = HeaderMap::new();
        assert_eq!(extract_credential(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("   "));
        assert_eq!(extract_credential(&headers), None);
    }

    #[tokio::test]
    async fn missing_header_rejects_before_any_store_access() {
        // The pool points nowhere; a store round-trip would error with 500.
        // Getting 401 proves the gate rejected before touching the store.
        let headers = HeaderMap::new();
        let result = require_auth(&headers, &test_keys(), &unreachable_pool()).await;
        let Err((status, axum::Json(body))) = result else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Authentication required");
    }

    #[tokio::test]
    async fn garbage_token_rejects_before_any_store_access() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("not-a-token"));
        let result = require_auth(&headers, &test_keys(), &unreachable_pool()).await;
        let Err((status, axum::Json(body))) = result else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Invalid or expired token");
    }

    #[tokio::test]
    async fn non_uuid_subject_rejects_before_any_store_access() -> anyhow::Result<()> {
        let keys = test_keys();
        let token = keys.sign("not-a-uuid", Utc::now().timestamp())?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&token)?);

        let result = require_auth(&headers, &keys, &unreachable_pool()).await;
        let Err((status, axum::Json(body))) = result else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Invalid or expired token");
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_internal_error_not_auth_failure() -> anyhow::Result<()> {
        let keys = test_keys();
        let token = keys.sign(&Uuid::new_v4().to_string(), Utc::now().timestamp())?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&token)?);

        let result = require_auth(&headers, &keys, &unreachable_pool()).await;
        let Err((status, _)) = result else {
            panic!("expected rejection");
        };
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }
}

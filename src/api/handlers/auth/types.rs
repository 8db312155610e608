//! Request/response contracts for registration and login.
//!
//! Bodies are strict: unknown fields are rejected at deserialization so
//! nothing reaches the service layer without matching the declared contract.
//! Passwords deserialize into `SecretString` and never appear in debug output.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::handlers::FieldError;

pub(crate) const USERNAME_MIN_LENGTH: usize = 3;
pub(crate) const USERNAME_MAX_LENGTH: usize = 30;
pub(crate) const PASSWORD_MIN_LENGTH: usize = 8;
pub(crate) const PASSWORD_MAX_LENGTH: usize = 100;

#[derive(ToSchema, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    #[schema(value_type = String)]
    pub password: SecretString,
}

/// Projection returned by both registration and login. The password hash is
/// never part of it.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Username must be 3-30 characters from `[A-Za-z0-9_]`, matched
/// case-sensitively everywhere.
pub(crate) fn valid_username(username: &str) -> bool {
    let length = username.len();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        return false;
    }
    Regex::new(r"^[A-Za-z0-9_]+$").is_ok_and(|regex| regex.is_match(username))
}

fn password_length_ok(password: &str) -> bool {
    (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&password.chars().count())
}

/// Full registration schema: username charset/bounds plus password
/// composition (digit, uppercase, lowercase, non-alphanumeric).
pub(crate) fn validate_register(request: &RegisterRequest) -> Vec<FieldError> {
    let mut details = Vec::new();

    if !valid_username(&request.username) {
        details.push(FieldError::new(
            "username",
            "must be 3-30 characters of letters, digits, or underscores",
        ));
    }

    let password = request.password.expose_secret();
    if password_length_ok(password) {
        if !password.chars().any(|c| c.is_ascii_digit()) {
            details.push(FieldError::new("password", "must contain a digit"));
        }
        if !password.chars().any(char::is_uppercase) {
            details.push(FieldError::new(
                "password",
                "must contain an uppercase letter",
            ));
        }
        if !password.chars().any(char::is_lowercase) {
            details.push(FieldError::new(
                "password",
                "must contain a lowercase letter",
            ));
        }
        if !password.chars().any(|c| !c.is_alphanumeric()) {
            details.push(FieldError::new(
                "password",
                "must contain a special character",
            ));
        }
    } else {
        details.push(FieldError::new("password", "must be 8-100 characters"));
    }

    details
}

/// Login only re-checks bounds; the password being validated already exists,
/// so composition rules are not re-applied.
pub(crate) fn validate_login(request: &LoginRequest) -> Vec<FieldError> {
    let mut details = Vec::new();

    if !valid_username(&request.username) {
        details.push(FieldError::new(
            "username",
            "must be 3-30 characters of letters, digits, or underscores",
        ));
    }

    if !password_length_ok(request.password.expose_secret()) {
        details.push(FieldError::new("password", "must be 8-100 characters"));
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    #[test]
    fn valid_username_accepts_charset_and_bounds() {
        assert!(valid_username("bob"));
        assert!(valid_username("alice_42"));
        assert!(valid_username("A_30_char_username_padded_out0"));
    }

    #[test]
    fn valid_username_rejects_bad_input() {
        assert!(!valid_username("ab")); // too short
        assert!(!valid_username(&"a".repeat(31))); // too long
        assert!(!valid_username("has space"));
        assert!(!valid_username("dash-ed"));
        assert!(!valid_username("ünïcode"));
        assert!(!valid_username(""));
    }

    #[test]
    fn username_matching_is_case_sensitive_by_charset() {
        // Mixed case is legal; the rules never normalize it away.
        assert!(valid_username("Alice"));
        assert!(valid_username("ALICE"));
    }

    #[test]
    fn validate_register_accepts_conforming_pair() {
        let details = validate_register(&register_request("alice", "Str0ng!pass"));
        assert!(details.is_empty(), "unexpected details: {details:?}");
    }

    #[test]
    fn validate_register_collects_password_composition_errors() {
        let details = validate_register(&register_request("alice", "alllowercase1!"));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "password");
        assert!(details[0].message.contains("uppercase"));

        let details = validate_register(&register_request("alice", "NoDigitsHere!"));
        assert!(details.iter().any(|d| d.message.contains("digit")));

        let details = validate_register(&register_request("alice", "NoSpecial1char"));
        assert!(details.iter().any(|d| d.message.contains("special")));
    }

    #[test]
    fn validate_register_checks_password_bounds_first() {
        let details = validate_register(&register_request("alice", "Ab1!"));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].message, "must be 8-100 characters");

        let long = format!("Aa1!{}", "x".repeat(100));
        let details = validate_register(&register_request("alice", &long));
        assert_eq!(details[0].message, "must be 8-100 characters");
    }

    #[test]
    fn validate_register_reports_multiple_fields() {
        let details = validate_register(&register_request("a", "short"));
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn validate_login_skips_composition_rules() {
        // A legacy password with no digits or specials still passes login
        // validation as long as the bounds hold.
        let details = validate_login(&login_request("alice", "justletters"));
        assert!(details.is_empty(), "unexpected details: {details:?}");
    }

    #[test]
    fn validate_login_still_checks_bounds() {
        let details = validate_login(&login_request("alice", "short"));
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "password");
    }

    #[test]
    fn register_request_rejects_unknown_fields() {
        let result: Result<RegisterRequest, _> = serde_json::from_str(
            r#"{"username": "alice", "password": "Str0ng!pass", "isAdmin": true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn register_request_debug_hides_password() {
        let request = register_request("alice", "Str0ng!pass");
        let debug = format!("{request:?}");
        assert!(!debug.contains("Str0ng!pass"));
    }
}

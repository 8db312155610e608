//! # Taskaro
//!
//! Multi-user task tracking with signed-identity authentication.
//!
//! Users register with a username and password, receive an RS256-signed
//! identity token, and manage their own tasks over a JSON HTTP API. Passwords
//! are stored as Argon2id digests; the signing key pair is loaded once at
//! startup and its absence is fatal.

pub mod api;
pub mod cli;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

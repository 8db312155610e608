//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action the binary executes.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::keys;
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
///
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let keys_opts = keys::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        private_key_path: keys_opts.private_key_path,
        public_key_path: keys_opts.public_key_path,
        token_ttl_seconds: keys_opts.token_ttl_seconds,
    }))
}

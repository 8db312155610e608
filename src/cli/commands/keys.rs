//! Token key-pair arguments.
//!
//! Both halves of the RSA key pair are required; startup fails hard if either
//! file is missing or unparseable.

use anyhow::{Context, Result};
use clap::{Arg, Command};

use crate::token::DEFAULT_TOKEN_TTL_SECONDS;

pub const ARG_PRIVATE_KEY: &str = "private-key";
pub const ARG_PUBLIC_KEY: &str = "public-key";
pub const ARG_TOKEN_TTL: &str = "token-ttl";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PRIVATE_KEY)
                .long(ARG_PRIVATE_KEY)
                .help("Path to the PEM encoded RSA private key used to sign identity tokens")
                .env("TASKARO_PRIVATE_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PUBLIC_KEY)
                .long(ARG_PUBLIC_KEY)
                .help("Path to the PEM encoded RSA public key used to verify identity tokens")
                .env("TASKARO_PUBLIC_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL)
                .long(ARG_TOKEN_TTL)
                .help("Identity token lifetime in seconds")
                .default_value("3600")
                .env("TASKARO_TOKEN_TTL")
                .value_parser(clap::value_parser!(i64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub private_key_path: String,
    pub public_key_path: String,
    pub token_ttl_seconds: i64,
}

impl Options {
    /// Extract the key-pair options from parsed matches.
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is absent.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let private_key_path = matches
            .get_one::<String>(ARG_PRIVATE_KEY)
            .cloned()
            .context("missing required argument: --private-key")?;
        let public_key_path = matches
            .get_one::<String>(ARG_PUBLIC_KEY)
            .cloned()
            .context("missing required argument: --public-key")?;
        let token_ttl_seconds = matches
            .get_one::<i64>(ARG_TOKEN_TTL)
            .copied()
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

        Ok(Self {
            private_key_path,
            public_key_path,
            token_ttl_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_paths_and_ttl() -> Result<()> {
        let command = crate::cli::commands::new();
        let matches = command.try_get_matches_from(vec![
            "taskaro",
            "--dsn",
            "postgres://localhost/taskaro",
            "--private-key",
            "/keys/private.pem",
            "--public-key",
            "/keys/public.pem",
        ])?;

        let options = Options::parse(&matches)?;
        assert_eq!(options.private_key_path, "/keys/private.pem");
        assert_eq!(options.public_key_path, "/keys/public.pem");
        assert_eq!(options.token_ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
        Ok(())
    }
}

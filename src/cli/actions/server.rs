use crate::{api, token::TokenKeys};
use anyhow::{Context, Result};
use std::{fs, sync::Arc};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub private_key_path: String,
    pub public_key_path: String,
    pub token_ttl_seconds: i64,
}

/// Execute the server action.
///
/// Key material is read exactly once here; a missing or unparseable key file
/// is a fatal startup condition.
///
/// # Errors
///
/// Returns an error if either key file cannot be read or parsed, or the
/// server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let private_key = fs::read(&args.private_key_path)
        .with_context(|| format!("Failed to read private key file: {}", args.private_key_path))?;
    let public_key = fs::read(&args.public_key_path)
        .with_context(|| format!("Failed to read public key file: {}", args.public_key_path))?;

    let keys = TokenKeys::from_pem(&private_key, &public_key, args.token_ttl_seconds)
        .context("Failed to parse token signing key pair")?;

    debug!("Identity token TTL: {}s", keys.ttl_seconds());

    api::new(args.port, args.dsn, Arc::new(keys)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_keys(private_key_path: String, public_key_path: String) -> Args {
        Args {
            port: 0,
            dsn: "postgres://localhost/taskaro".to_string(),
            private_key_path,
            public_key_path,
            token_ttl_seconds: 3600,
        }
    }

    #[tokio::test]
    async fn missing_private_key_is_fatal() {
        let args = args_with_keys(
            "/nonexistent/taskaro-private.pem".to_string(),
            "/nonexistent/taskaro-public.pem".to_string(),
        );
        let err = execute(args).await.expect_err("startup must fail");
        assert!(
            err.to_string().contains("Failed to read private key file"),
            "unexpected error: {err:#}"
        );
    }

    #[tokio::test]
    async fn unparseable_key_is_fatal() -> Result<()> {
        let dir = std::env::temp_dir();
        let private_path = dir.join(format!("taskaro-test-bad-private-{}.pem", std::process::id()));
        let public_path = dir.join(format!("taskaro-test-bad-public-{}.pem", std::process::id()));
        fs::write(&private_path, "not a key")?;
        fs::write(&public_path, "not a key either")?;

        let args = args_with_keys(
            private_path.display().to_string(),
            public_path.display().to_string(),
        );
        let result = execute(args).await;

        fs::remove_file(&private_path)?;
        fs::remove_file(&public_path)?;

        let err = result.expect_err("startup must fail");
        assert!(
            err.to_string()
                .contains("Failed to parse token signing key pair"),
            "unexpected error: {err:#}"
        );
        Ok(())
    }
}

//! Runtime configuration gathered from flags and environment variables

use anyhow::{Context, Result};
use bankoffice_business::{
    Actor, AuthService, BusinessError, Ed25519TokenIssuer, ServiceContext, Sha256PasswordHasher,
};
use chrono::Duration;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::db;
use crate::Cli;

/// Signing seed used when none is configured. Tokens signed with it are only
/// fit for local experiments.
const DEV_SECRET_KEY: &str = "6261 6e6b 6f66 6669 6365 2d64 6576 2d6f 6e6c 792d 7365 6564 2d6b 6579 2d30 3031";

pub struct Config {
    pub db_path: PathBuf,
    pub token: Option<String>,
    pub secret_key: Option<String>,
    pub token_ttl: Duration,
    pub json: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            db_path: cli.db.clone(),
            token: cli.token.clone(),
            secret_key: cli.secret_key.clone(),
            token_ttl: Duration::minutes(cli.token_ttl_minutes.max(1)),
            json: cli.json,
        }
    }

    fn secret_key(&self) -> String {
        match &self.secret_key {
            Some(key) => key.clone(),
            None => {
                warn!("BANKOFFICE_SECRET_KEY not set, signing tokens with the development key");
                DEV_SECRET_KEY.replace(' ', "")
            }
        }
    }

    /// Open the database and wire up the capabilities
    pub async fn context(&self) -> Result<ServiceContext> {
        let db = db::connect(&self.db_path).await?;
        let tokens = Ed25519TokenIssuer::from_hex(&self.secret_key())
            .context("Invalid BANKOFFICE_SECRET_KEY")?;

        Ok(ServiceContext::new(
            db,
            Arc::new(Sha256PasswordHasher::new()),
            Arc::new(tokens),
        )
        .with_token_ttl(self.token_ttl))
    }

    /// Resolve the acting user from the configured token
    pub async fn actor(&self, ctx: &ServiceContext) -> Result<Actor> {
        let token = self.token.as_deref().ok_or_else(|| {
            BusinessError::unauthorized(
                "No token given; run `bankoffice login` and pass --token or set BANKOFFICE_TOKEN",
            )
        })?;
        Ok(AuthService::new(ctx).authenticate(token).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_key_is_valid_seed() {
        let hex = DEV_SECRET_KEY.replace(' ', "");
        assert_eq!(hex.len(), 64);
        assert!(Ed25519TokenIssuer::from_hex(&hex).is_ok());
    }
}

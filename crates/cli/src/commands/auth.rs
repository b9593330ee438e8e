//! Bootstrap and login commands

use anyhow::Result;
use bankoffice_business::{AuthService, ServiceContext, UserService};

use crate::config::Config;
use crate::output;

/// Create the first ADMIN user
pub async fn bootstrap_admin(
    ctx: &ServiceContext,
    config: &Config,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let admin = UserService::new(ctx)
        .bootstrap_admin(username, email, password)
        .await?;
    if !config.json {
        println!("✅ Admin created");
    }
    output::one(config.json, &admin)
}

/// Print a fresh access token, so it can be captured into BANKOFFICE_TOKEN
pub async fn login(ctx: &ServiceContext, username: &str, password: &str) -> Result<()> {
    let token = AuthService::new(ctx).login(username, password).await?;
    println!("{}", token.token);
    Ok(())
}

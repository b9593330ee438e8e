//! Authentication
//!
//! Turns credentials into an access token and an access token back into the
//! acting principal. The role always comes from the stored user, so a role
//! change applies to tokens already issued.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use bankoffice_core::policy::Actor;
use bankoffice_persistence::UserRepo;
use tracing::{debug, info};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Token handed back by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub token_type: &'static str,
}

/// Auth Service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn login(&self, username: &str, password: &str) -> BusinessResult<AccessToken> {
        let user = UserRepo::find_by_username(self.ctx.pool(), username)
            .await?
            .filter(|u| self.ctx.hasher().verify(password, &u.password_hash))
            .ok_or_else(|| BusinessError::unauthorized(BAD_CREDENTIALS))?;

        let token = self
            .ctx
            .tokens()
            .issue(&user.username, user.role.as_str(), self.ctx.token_ttl())
            .map_err(|e| {
                debug!(error = %e, "token issue failed");
                BusinessError::unauthorized("Could not issue token")
            })?;

        info!(user = %user.id, role = %user.role, "login");
        Ok(AccessToken {
            token,
            token_type: "bearer",
        })
    }

    /// Resolve the actor behind a bearer token
    pub async fn authenticate(&self, token: &str) -> BusinessResult<Actor> {
        let claims = self.ctx.tokens().verify(token).map_err(|e| {
            debug!(error = %e, "token rejected");
            BusinessError::unauthorized("Invalid token")
        })?;
        if claims.sub.is_empty() {
            return Err(BusinessError::unauthorized("Invalid token"));
        }

        let user = UserRepo::find_by_username(self.ctx.pool(), &claims.sub)
            .await?
            .ok_or_else(|| BusinessError::unauthorized("User not found"))?;
        Ok(user.actor())
    }
}

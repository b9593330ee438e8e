//! Service context
//!
//! Every capability a service needs is held here explicitly: the store, the
//! password hasher, the token issuer and the IBAN generator. Nothing is a
//! process-wide singleton.

use crate::error::{BusinessError, BusinessResult};
use crate::security::{PasswordHasher, TokenIssuer};
use bankoffice_core::policy::{self, Actor, Operation, Target};
use bankoffice_core::IbanGenerator;
use bankoffice_persistence::Database;
use chrono::Duration;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::warn;

/// Default access-token lifetime
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Context for business operations
#[derive(Clone)]
pub struct ServiceContext {
    db: Database,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    ibans: IbanGenerator,
    token_ttl: Duration,
}

impl ServiceContext {
    pub fn new(db: Database, hasher: Arc<dyn PasswordHasher>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self {
            db,
            hasher,
            tokens,
            ibans: IbanGenerator::new(),
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    pub fn tokens(&self) -> &dyn TokenIssuer {
        self.tokens.as_ref()
    }

    pub fn ibans(&self) -> &IbanGenerator {
        &self.ibans
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Run the access check; a denial becomes `Forbidden` and is logged.
    pub fn authorize(&self, actor: &Actor, operation: Operation, target: Target) -> BusinessResult<()> {
        policy::authorize(actor, operation, target)
            .into_result()
            .map_err(|reason| {
                warn!(actor = %actor, ?operation, reason, "access denied");
                BusinessError::forbidden(reason)
            })
    }
}

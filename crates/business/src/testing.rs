//! Shared fixtures for unit tests

use crate::security::{Ed25519TokenIssuer, Sha256PasswordHasher};
use crate::services::ServiceContext;
use crate::user::{NewUser, UserService};
use bankoffice_core::{Role, User};
use bankoffice_persistence::Database;
use std::sync::Arc;

/// Fresh in-memory context with a cheap hasher
pub async fn context() -> ServiceContext {
    let db = Database::in_memory().await.unwrap();
    ServiceContext::new(
        db,
        Arc::new(Sha256PasswordHasher::with_iterations(1)),
        Arc::new(Ed25519TokenIssuer::generate()),
    )
}

/// `root` (ADMIN), `bob` (BANKER) and `carol` (CLIENT), password `<name>-pw`
pub async fn seed_users(ctx: &ServiceContext) -> (User, User, User) {
    let users = UserService::new(ctx);
    let admin = users
        .bootstrap_admin("root", "root@example.com", "root-pw")
        .await
        .unwrap();
    let banker = users
        .create_user(&admin.actor(), new_user("bob", Role::Banker))
        .await
        .unwrap();
    let client = users
        .create_user(&banker.actor(), new_user("carol", Role::Client))
        .await
        .unwrap();
    (admin, banker, client)
}

fn new_user(name: &str, role: Role) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password: format!("{name}-pw"),
        role,
    }
}

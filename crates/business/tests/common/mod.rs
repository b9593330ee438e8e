//! Shared setup for the integration tests

#![allow(dead_code)]

use bankoffice_business::{
    AccountService, AccountUpdate, CardService, Ed25519TokenIssuer, NewAccount, NewUser,
    ServiceContext, Sha256PasswordHasher, UserService,
};
use bankoffice_core::{Account, Role, User};
use bankoffice_persistence::Database;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

pub fn context_on(db: Database) -> ServiceContext {
    ServiceContext::new(
        db,
        Arc::new(Sha256PasswordHasher::with_iterations(1)),
        Arc::new(Ed25519TokenIssuer::generate()),
    )
}

pub async fn context() -> ServiceContext {
    context_on(Database::in_memory().await.unwrap())
}

pub struct Cast {
    pub admin: User,
    pub banker: User,
    pub alice: User,
    pub bob: User,
}

pub async fn cast(ctx: &ServiceContext) -> Cast {
    let users = UserService::new(ctx);
    let admin = users
        .bootstrap_admin("admin", "admin@bank.test", "admin-pw")
        .await
        .unwrap();
    let banker = users
        .create_user(&admin.actor(), new_user("banker", Role::Banker))
        .await
        .unwrap();
    let alice = users
        .create_user(&banker.actor(), new_user("alice", Role::Client))
        .await
        .unwrap();
    let bob = users
        .create_user(&banker.actor(), new_user("bob", Role::Client))
        .await
        .unwrap();
    Cast {
        admin,
        banker,
        alice,
        bob,
    }
}

pub fn new_user(name: &str, role: Role) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@bank.test"),
        password: format!("{name}-pw"),
        role,
    }
}

/// Active current account with a pending card and the given balance
pub async fn card_account(ctx: &ServiceContext, cast: &Cast, owner: &User, balance: Decimal) -> Account {
    let accounts = AccountService::new(ctx);
    let account = accounts
        .admin_create_account(&cast.admin.actor(), owner.id, NewAccount::default())
        .await
        .unwrap();
    CardService::new(ctx)
        .request_card(&owner.actor(), account.id, dec!(2000))
        .await
        .unwrap();
    accounts
        .update_account(
            &cast.banker.actor(),
            account.id,
            AccountUpdate {
                balance: Some(balance),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

pub async fn balance(ctx: &ServiceContext, cast: &Cast, account: &Account) -> Decimal {
    AccountService::new(ctx)
        .get_account(&cast.admin.actor(), account.id)
        .await
        .unwrap()
        .balance
}

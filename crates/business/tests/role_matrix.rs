//! Integration tests for the role matrix
//!
//! Literal scenarios for who may do what, run end-to-end through the services.

mod common;

use bankoffice_business::{
    AccountService, AuthService, CardService, ErrorKind, NewAccount, UserService,
};
use bankoffice_core::{AccountType, CardStatus, Role};
use common::{cast, context, new_user};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_client_cannot_request_account_for_someone_else() {
    let ctx = context().await;
    let cast = cast(&ctx).await;

    let err = AccountService::new(&ctx)
        .request_account(&cast.alice.actor(), cast.bob.id, NewAccount::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_banker_creates_clients_only() {
    let ctx = context().await;
    let cast = cast(&ctx).await;
    let users = UserService::new(&ctx);

    let carol = users
        .create_user(&cast.banker.actor(), new_user("carol", Role::Client))
        .await
        .unwrap();
    assert_eq!(carol.role, Role::Client);

    let err = users
        .create_user(&cast.banker.actor(), new_user("eve", Role::Admin))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_admin_creates_bankers_only() {
    let ctx = context().await;
    let cast = cast(&ctx).await;

    let err = UserService::new(&ctx)
        .create_user(&cast.admin.actor(), new_user("carol", Role::Client))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_low_salary_card_request() {
    let ctx = context().await;
    let cast = cast(&ctx).await;
    let account = AccountService::new(&ctx)
        .admin_create_account(&cast.admin.actor(), cast.alice.id, NewAccount::default())
        .await
        .unwrap();

    let err = CardService::new(&ctx)
        .request_card(&cast.alice.actor(), account.id, dec!(100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_decline_needs_reason() {
    let ctx = context().await;
    let cast = cast(&ctx).await;
    let account = AccountService::new(&ctx)
        .admin_create_account(&cast.admin.actor(), cast.alice.id, NewAccount::default())
        .await
        .unwrap();
    let cards = CardService::new(&ctx);
    let card = cards
        .request_card(&cast.alice.actor(), account.id, dec!(750))
        .await
        .unwrap();

    let err = cards
        .review_card(&cast.banker.actor(), card.id, CardStatus::Declined, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);

    // Still reviewable after the rejected attempt
    let approved = cards.approve(&cast.banker.actor(), card.id).await.unwrap();
    assert_eq!(approved.status, CardStatus::Approved);
    let err = cards.approve(&cast.banker.actor(), card.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_admin_cannot_change_account_status() {
    let ctx = context().await;
    let cast = cast(&ctx).await;
    let accounts = AccountService::new(&ctx);
    let account = accounts
        .request_account(
            &cast.alice.actor(),
            cast.alice.id,
            NewAccount {
                currency: "ALL".to_string(),
                account_type: AccountType::Savings,
            },
        )
        .await
        .unwrap();

    let err = accounts.activate(&cast.admin.actor(), account.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = accounts.activate(&cast.alice.actor(), account.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(accounts.activate(&cast.banker.actor(), account.id).await.is_ok());

    // Both banker and admin may delete
    accounts.delete_account(&cast.admin.actor(), account.id).await.unwrap();
}

#[tokio::test]
async fn test_token_actor_drives_permissions() {
    let ctx = context().await;
    let cast = cast(&ctx).await;
    let auth = AuthService::new(&ctx);

    let token = auth.login("alice", "alice-pw").await.unwrap();
    let actor = auth.authenticate(&token.token).await.unwrap();
    assert_eq!(actor.id, cast.alice.id);

    let err = AccountService::new(&ctx).list_accounts(&actor).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let own = AccountService::new(&ctx)
        .list_accounts_for_owner(&actor, cast.alice.id)
        .await
        .unwrap();
    assert!(own.is_empty());
}

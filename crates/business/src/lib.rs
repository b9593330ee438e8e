//! # Bankoffice Business
//!
//! Business logic layer: the user, account, card and ledger registries plus
//! authentication. Every operation takes an already-authenticated [`Actor`],
//! consults the access policy, then reads and writes through the store.
//!
//! ```rust,ignore
//! let ctx = ServiceContext::new(db, hasher, tokens);
//! let actor = AuthService::new(&ctx).authenticate(&token).await?;
//! let debit = LedgerService::new(&ctx)
//!     .transfer(&actor, account_id, TransferRequest { recipient_iban, amount })
//!     .await?;
//! ```

pub mod account;
pub mod auth;
pub mod card;
pub mod error;
pub mod ledger;
pub mod security;
pub mod services;
pub mod user;

#[cfg(test)]
mod testing;

pub use account::{AccountService, AccountUpdate, NewAccount};
pub use auth::{AccessToken, AuthService};
pub use bankoffice_core::policy::Actor;
pub use card::CardService;
pub use error::{BusinessError, BusinessResult, ErrorKind};
pub use ledger::{LedgerService, TransferRequest};
pub use security::{
    AuthError, Claims, Ed25519TokenIssuer, PasswordHasher, Sha256PasswordHasher, TokenIssuer,
};
pub use services::ServiceContext;
pub use user::{NewUser, UserService, UserUpdate};

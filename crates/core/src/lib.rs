//! # Bankoffice Core
//!
//! Domain types for the banking back-office: users and their roles, bank
//! accounts, debit-card applications and ledger transactions, plus the two
//! pure building blocks everything else leans on:
//!
//! - [`policy`]: the role/operation access table
//! - [`iban`]: checksummed account identifier generation
//!
//! Nothing in this crate performs I/O.

pub mod account;
pub mod card;
pub mod error;
pub mod iban;
pub mod ledger;
pub mod money;
pub mod policy;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountStatus, AccountType};
pub use card::{Card, CardStatus, MIN_MONTHLY_SALARY};
pub use error::{CoreError, CoreResult};
pub use iban::IbanGenerator;
pub use ledger::TransferPlan;
pub use money::Currency;
pub use policy::{Actor, Decision, Operation, Target};
pub use transaction::{Transaction, TransactionType};
pub use user::{Role, User};

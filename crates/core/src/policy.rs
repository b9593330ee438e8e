//! # Access Policy
//!
//! Who may do what, as a lookup table keyed by `(Role, Operation)`.
//!
//! The three roles do not form a superset chain. ADMIN cannot change an
//! account's status, BANKER cannot touch ADMIN users, only a CLIENT can ask
//! for a card, and so on. Every asymmetry lives in [`RULES`] so it can be read
//! (and tested) in one place instead of being spread across services.
//!
//! Lifecycle checks (card already reviewed, missing linked card, ...) are not
//! decided here; they belong to the services and fail with their own errors.

use crate::user::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An authenticated principal: who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}

/// Every guarded operation in the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Users
    CreateUser,
    ReadUser,
    ListUsers,
    UpdateUser,
    DeleteUser,
    // Accounts
    RequestAccount,
    AdminCreateAccount,
    ReadAccount,
    ListAccounts,
    UpdateAccount,
    SetAccountStatus,
    DeleteAccount,
    // Cards
    RequestCard,
    ReviewCard,
    ReadCard,
    ListCards,
    DeleteCard,
    // Transactions
    Transfer,
    ReadTransaction,
    ListTransactions,
    DeleteTransaction,
}

/// What the operation is applied to, as far as the policy needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A collection, or a check made before the concrete resource is known.
    /// Owner- and role-scoped rules pass here and are re-checked per item.
    Collection,
    /// A resource owned by the given user id (account, card, transaction)
    Owned(Uuid),
    /// An existing user
    User { id: Uuid, role: Role },
    /// A user about to be created with this role
    NewUser(Role),
}

/// One cell of the access table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Deny(&'static str),
    Allow,
    /// Only when the actor owns the target (or *is* the target user)
    OwnOnly(&'static str),
    /// Only when the target user's role is in the set
    Roles(&'static [Role], &'static str),
}

/// Outcome of an access check. A denial always carries a readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// `Ok(())` on allow, `Err(reason)` on deny
    pub fn into_result(self) -> Result<(), &'static str> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

const ACCESS_DENIED: &str = "Access denied";

use Operation::*;
use Role::{Admin, Banker, Client};

/// The access table. Missing entries deny.
pub const RULES: &[(Role, Operation, Rule)] = &[
    // === Users ===
    (Client, CreateUser, Rule::Deny(ACCESS_DENIED)),
    (Banker, CreateUser, Rule::Roles(&[Client], "Banker can only create CLIENT users")),
    (Admin, CreateUser, Rule::Roles(&[Banker], "Admin can only create BANKER users")),
    (Client, ReadUser, Rule::OwnOnly(ACCESS_DENIED)),
    (Banker, ReadUser, Rule::Roles(&[Client, Banker], ACCESS_DENIED)),
    (Admin, ReadUser, Rule::Allow),
    (Client, ListUsers, Rule::Deny(ACCESS_DENIED)),
    (Banker, ListUsers, Rule::Roles(&[Client, Banker], ACCESS_DENIED)),
    (Admin, ListUsers, Rule::Allow),
    (Client, UpdateUser, Rule::OwnOnly("Clients can only update themselves")),
    (Banker, UpdateUser, Rule::Roles(&[Client], "Banker can only update CLIENT users")),
    (Admin, UpdateUser, Rule::Roles(&[Banker], "Admin can only update BANKER users")),
    (Client, DeleteUser, Rule::Deny("Clients cannot delete users")),
    (Banker, DeleteUser, Rule::Roles(&[Client], "Banker can only delete CLIENT users")),
    (Admin, DeleteUser, Rule::Roles(&[Banker], "Admin can only delete BANKER users")),
    // === Accounts ===
    (Client, RequestAccount, Rule::OwnOnly("Clients can only create accounts for themselves")),
    (Banker, RequestAccount, Rule::Deny("Only clients can request new accounts")),
    (Admin, RequestAccount, Rule::Deny("Only clients can request new accounts")),
    (Client, AdminCreateAccount, Rule::Deny("Only admins can create accounts")),
    (Banker, AdminCreateAccount, Rule::Deny("Only admins can create accounts")),
    (Admin, AdminCreateAccount, Rule::Allow),
    (Client, ReadAccount, Rule::OwnOnly(ACCESS_DENIED)),
    (Banker, ReadAccount, Rule::Allow),
    (Admin, ReadAccount, Rule::Allow),
    (Client, ListAccounts, Rule::Deny(ACCESS_DENIED)),
    (Banker, ListAccounts, Rule::Allow),
    (Admin, ListAccounts, Rule::Allow),
    (Client, UpdateAccount, Rule::Deny("Only bankers can update account")),
    (Banker, UpdateAccount, Rule::Allow),
    (Admin, UpdateAccount, Rule::Deny("Only bankers can update account")),
    (Client, SetAccountStatus, Rule::Deny("Only bankers can update account")),
    (Banker, SetAccountStatus, Rule::Allow),
    (Admin, SetAccountStatus, Rule::Deny("Only bankers can update account")),
    (Client, DeleteAccount, Rule::Deny("Only bankers or admins can delete accounts")),
    (Banker, DeleteAccount, Rule::Allow),
    (Admin, DeleteAccount, Rule::Allow),
    // === Cards ===
    (Client, RequestCard, Rule::OwnOnly("Clients can only request cards for their own accounts")),
    (Banker, RequestCard, Rule::Deny("Only client can request a new card")),
    (Admin, RequestCard, Rule::Deny("Only client can request a new card")),
    (Client, ReviewCard, Rule::Deny("Only banker can review card")),
    (Banker, ReviewCard, Rule::Allow),
    (Admin, ReviewCard, Rule::Deny("Only banker can review card")),
    (Client, ReadCard, Rule::OwnOnly("Not authorized to view this card")),
    (Banker, ReadCard, Rule::Allow),
    (Admin, ReadCard, Rule::Allow),
    (Client, ListCards, Rule::Deny("Not authorized to view all cards")),
    (Banker, ListCards, Rule::Allow),
    (Admin, ListCards, Rule::Allow),
    (Client, DeleteCard, Rule::Deny("Only admin or banker can delete card applications")),
    (Banker, DeleteCard, Rule::Allow),
    (Admin, DeleteCard, Rule::Allow),
    // === Transactions ===
    (Client, Transfer, Rule::OwnOnly("You don't have permission to perform this transaction")),
    (Banker, Transfer, Rule::Allow),
    (Admin, Transfer, Rule::Allow),
    (Client, ReadTransaction, Rule::OwnOnly("Access denied to this transaction")),
    (Banker, ReadTransaction, Rule::Allow),
    (Admin, ReadTransaction, Rule::Allow),
    (Client, ListTransactions, Rule::OwnOnly(ACCESS_DENIED)),
    (Banker, ListTransactions, Rule::Allow),
    (Admin, ListTransactions, Rule::Allow),
    (Client, DeleteTransaction, Rule::Deny("Clients cannot delete transactions")),
    (Banker, DeleteTransaction, Rule::Allow),
    (Admin, DeleteTransaction, Rule::Allow),
];

/// Look up the table cell for `(role, operation)`
pub fn rule(role: Role, operation: Operation) -> Rule {
    RULES
        .iter()
        .find(|(r, op, _)| *r == role && *op == operation)
        .map(|(_, _, rule)| *rule)
        .unwrap_or(Rule::Deny(ACCESS_DENIED))
}

/// Decide whether `actor` may perform `operation` on `target`.
pub fn authorize(actor: &Actor, operation: Operation, target: Target) -> Decision {
    match (rule(actor.role, operation), target) {
        (Rule::Deny(reason), _) => Decision::Deny(reason),
        (Rule::Allow, _) => Decision::Allow,
        (Rule::OwnOnly(_) | Rule::Roles(..), Target::Collection) => Decision::Allow,
        (Rule::OwnOnly(reason), Target::Owned(owner) | Target::User { id: owner, .. }) => {
            if owner == actor.id {
                Decision::Allow
            } else {
                Decision::Deny(reason)
            }
        }
        (Rule::OwnOnly(reason), Target::NewUser(_)) => Decision::Deny(reason),
        (Rule::Roles(allowed, reason), Target::User { role, .. } | Target::NewUser(role)) => {
            if allowed.contains(&role) {
                Decision::Allow
            } else {
                Decision::Deny(reason)
            }
        }
        (Rule::Roles(_, reason), Target::Owned(_)) => Decision::Deny(reason),
    }
}

/// Whether the collection visible to this role for `operation` is limited to
/// resources the actor owns.
pub fn is_owner_scoped(role: Role, operation: Operation) -> bool {
    matches!(rule(role, operation), Rule::OwnOnly(_))
}

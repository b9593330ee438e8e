//! # User Module
//!
//! Roles and user identities.
//! - Admin: manages bankers, opens accounts directly
//! - Banker: manages clients, reviews accounts and card applications
//! - Client: requests accounts and cards, transfers money from own accounts
//!
//! The hierarchy Admin > Banker > Client is not additive: each role holds its
//! own permission set, see [`crate::policy`].

use crate::policy::Actor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of a user in the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Banker,
    Client,
}

impl Role {
    /// Code string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Banker => "BANKER",
            Role::Client => "CLIENT",
        }
    }

    /// Parse from a string, case-insensitive
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "BANKER" => Some(Role::Banker),
            "CLIENT" => Some(Role::Client),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A back-office user.
///
/// `password_hash` is opaque here; it is produced and checked by the password
/// hashing capability of the business layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a user with a fresh id
    pub fn new(username: &str, email: &str, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    /// The principal this user acts as
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {})", self.username, self.id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_str() {
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::Client.as_str(), "CLIENT");
        assert_eq!(Role::from_str("banker"), Some(Role::Banker));
        assert_eq!(Role::from_str("ROOT"), None);
    }

    #[test]
    fn test_role_serde_uppercase() {
        let json = serde_json::to_string(&Role::Banker).unwrap();
        assert_eq!(json, "\"BANKER\"");
    }

    #[test]
    fn test_user_actor() {
        let alice = User::new("alice", "alice@example.com", "x".to_string(), Role::Client);
        let actor = alice.actor();
        assert_eq!(actor.id, alice.id);
        assert_eq!(actor.role, Role::Client);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let bob = User::new("bob", "bob@example.com", "secret-hash".to_string(), Role::Banker);
        let json = serde_json::to_string(&bob).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"BANKER\""));
    }
}

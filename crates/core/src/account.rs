//! # Account Module
//!
//! Bank accounts. Each account belongs to one user (by id), carries a single
//! decimal balance in one currency and moves through a small lifecycle:
//! PENDING -> ACTIVE or PENDING -> DECLINED.

use crate::iban::IbanGenerator;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// Requested by a client, waiting for a banker
    Pending,
    Active,
    Declined,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "PENDING",
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Declined => "DECLINED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(AccountStatus::Pending),
            "ACTIVE" => Some(AccountStatus::Active),
            "DECLINED" => Some(AccountStatus::Declined),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Current,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Current => "CURRENT",
            AccountType::Savings => "SAVINGS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "CURRENT" => Some(AccountType::Current),
            "SAVINGS" => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank account.
///
/// The balance is not constrained at rest (a banker may set any value);
/// non-negativity is only enforced when money leaves through a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub iban: String,
    pub balance: Decimal,
    pub currency: String,
    pub status: AccountStatus,
    pub account_type: AccountType,
    /// Owning user. Not enforced as a foreign key: the owner may be deleted.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Open a zero-balance account with a freshly generated IBAN
    pub fn open(
        owner_id: Uuid,
        currency: &str,
        account_type: AccountType,
        status: AccountStatus,
        iban: &IbanGenerator,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            iban: iban.generate(),
            balance: Decimal::ZERO,
            currency: currency.to_string(),
            status,
            account_type,
            owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Debit cards are only issued against active current accounts
    pub fn is_card_eligible(&self) -> bool {
        self.is_active() && self.account_type == AccountType::Current
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} ({}, {} {}, {}, owner: {})",
            self.iban, self.account_type, self.balance, self.currency, self.status, self.owner_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iban;

    #[test]
    fn test_open_account() {
        let owner = Uuid::new_v4();
        let account = Account::open(
            owner,
            "EUR",
            AccountType::Current,
            AccountStatus::Pending,
            &IbanGenerator::new(),
        );

        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.status, AccountStatus::Pending);
        assert!(account.is_owned_by(owner));
        assert!(iban::is_valid(&account.iban));
    }

    #[test]
    fn test_card_eligibility() {
        let mut account = Account::open(
            Uuid::new_v4(),
            "EUR",
            AccountType::Current,
            AccountStatus::Pending,
            &IbanGenerator::new(),
        );
        assert!(!account.is_card_eligible());

        account.status = AccountStatus::Active;
        assert!(account.is_card_eligible());

        account.account_type = AccountType::Savings;
        assert!(!account.is_card_eligible());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(AccountStatus::from_str("active"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::Declined.as_str(), "DECLINED");
        assert_eq!(AccountType::from_str("savings"), Some(AccountType::Savings));
        assert_eq!(AccountType::from_str("checking"), None);
    }
}

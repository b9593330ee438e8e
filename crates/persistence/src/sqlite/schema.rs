//! Database schema definitions
//!
//! Row types for sqlx mapping from SQLite tables.
//! The schema is defined in migrations/20261018000000_init.sql. Ids are
//! stored as TEXT UUIDs and decimals as TEXT to keep exact precision.

use crate::error::{PersistenceError, PersistenceResult};
use bankoffice_core::{
    Account, AccountStatus, AccountType, Card, CardStatus, Role, Transaction, TransactionType,
    User,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Row type for the `users` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `accounts` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub iban: String,
    pub balance: String, // Decimal stored as TEXT
    pub currency: String,
    pub status: String,
    pub account_type: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `cards` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CardRow {
    pub id: String,
    pub account_id: String,
    pub monthly_salary: String, // Decimal stored as TEXT
    pub status: String,
    pub decline_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row type for the `transactions` table
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub account_id: String,
    pub amount: String, // Decimal stored as TEXT
    pub currency: String,
    pub tx_type: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// === Field parsing helpers ===

pub(crate) fn parse_uuid(value: &str) -> PersistenceResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| PersistenceError::InvalidUuid(value.to_string()))
}

pub(crate) fn parse_decimal(value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value).map_err(|e| PersistenceError::InvalidDecimal(format!("{value}: {e}")))
}

// === Conversion implementations ===

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            role: Role::from_str(&row.role)
                .ok_or_else(|| PersistenceError::invalid_enum("role", &row.role))?,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            iban: account.iban.clone(),
            balance: account.balance.to_string(),
            currency: account.currency.clone(),
            status: account.status.as_str().to_string(),
            account_type: account.account_type.as_str().to_string(),
            owner_id: account.owner_id.to_string(),
            created_at: account.created_at,
        }
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            balance: parse_decimal(&row.balance)?,
            status: AccountStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("status", &row.status))?,
            account_type: AccountType::from_str(&row.account_type)
                .ok_or_else(|| PersistenceError::invalid_enum("account_type", &row.account_type))?,
            owner_id: parse_uuid(&row.owner_id)?,
            iban: row.iban,
            currency: row.currency,
            created_at: row.created_at,
        })
    }
}

impl From<&Card> for CardRow {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.to_string(),
            account_id: card.account_id.to_string(),
            monthly_salary: card.monthly_salary.to_string(),
            status: card.status.as_str().to_string(),
            decline_reason: card.decline_reason.clone(),
            created_at: card.created_at,
        }
    }
}

impl TryFrom<CardRow> for Card {
    type Error = PersistenceError;

    fn try_from(row: CardRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            account_id: parse_uuid(&row.account_id)?,
            monthly_salary: parse_decimal(&row.monthly_salary)?,
            status: CardStatus::from_str(&row.status)
                .ok_or_else(|| PersistenceError::invalid_enum("status", &row.status))?,
            decline_reason: row.decline_reason,
            created_at: row.created_at,
        })
    }
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            account_id: tx.account_id.to_string(),
            amount: tx.amount.to_string(),
            currency: tx.currency.clone(),
            tx_type: tx.tx_type.as_str().to_string(),
            description: tx.description.clone(),
            created_at: tx.created_at,
        }
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            account_id: parse_uuid(&row.account_id)?,
            amount: parse_decimal(&row.amount)?,
            tx_type: TransactionType::from_str(&row.tx_type)
                .ok_or_else(|| PersistenceError::invalid_enum("tx_type", &row.tx_type))?,
            currency: row.currency,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

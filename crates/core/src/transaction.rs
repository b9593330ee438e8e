//! # Transaction Module
//!
//! Ledger lines. A transaction is immutable once created; a transfer produces
//! one DEBIT on the sender and one CREDIT on the recipient.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEBIT" => Some(TransactionType::Debit),
            "CREDIT" => Some(TransactionType::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ledger line. `amount` is always a positive magnitude; the direction
/// lives in `tx_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub tx_type: TransactionType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        account_id: Uuid,
        tx_type: TransactionType,
        amount: Decimal,
        currency: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            currency: currency.to_string(),
            tx_type,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn debit(account_id: Uuid, amount: Decimal, currency: &str) -> Self {
        Self::new(account_id, TransactionType::Debit, amount, currency)
    }

    pub fn credit(account_id: Uuid, amount: Decimal, currency: &str) -> Self {
        Self::new(account_id, TransactionType::Credit, amount, currency)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Balance delta this line represents on its account
    pub fn signed_amount(&self) -> Decimal {
        match self.tx_type {
            TransactionType::Debit => -self.amount,
            TransactionType::Credit => self.amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} on {}",
            self.tx_type, self.amount, self.currency, self.account_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amount() {
        let account = Uuid::new_v4();
        let debit = Transaction::debit(account, dec!(25.50), "EUR");
        let credit = Transaction::credit(account, dec!(25.50), "EUR");

        assert_eq!(debit.signed_amount(), dec!(-25.50));
        assert_eq!(credit.signed_amount(), dec!(25.50));
        assert_eq!(debit.signed_amount() + credit.signed_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_with_description() {
        let tx = Transaction::debit(Uuid::new_v4(), dec!(1), "EUR").with_description("rent");
        assert_eq!(tx.description.as_deref(), Some("rent"));
        assert_eq!(TransactionType::from_str("credit"), Some(TransactionType::Credit));
    }
}

//! # Card Module
//!
//! Debit-card applications. One card per account; review is one-shot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Minimum monthly salary (account currency) to apply for a debit card
pub const MIN_MONTHLY_SALARY: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Review status of a card application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardStatus {
    Pending,
    Approved,
    Declined,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Pending => "PENDING",
            CardStatus::Approved => "APPROVED",
            CardStatus::Declined => "DECLINED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(CardStatus::Pending),
            "APPROVED" => Some(CardStatus::Approved),
            "DECLINED" => Some(CardStatus::Declined),
            _ => None,
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debit-card application linked to exactly one account.
///
/// `decline_reason` is set iff `status == Declined`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub account_id: Uuid,
    pub monthly_salary: Decimal,
    pub status: CardStatus,
    pub decline_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// New pending application
    pub fn apply(account_id: Uuid, monthly_salary: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            monthly_salary,
            status: CardStatus::Pending,
            decline_reason: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_reviewed(&self) -> bool {
        self.status != CardStatus::Pending
    }

    pub fn approve(&mut self) {
        self.status = CardStatus::Approved;
        self.decline_reason = None;
    }

    pub fn decline(&mut self, reason: &str) {
        self.status = CardStatus::Declined;
        self.decline_reason = Some(reason.to_string());
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card {} ({}) on account {}", self.id, self.status, self.account_id)?;
        if let Some(reason) = &self.decline_reason {
            write!(f, ": {}", reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_min_salary_constant() {
        assert_eq!(MIN_MONTHLY_SALARY, dec!(500));
    }

    #[test]
    fn test_review_transitions() {
        let mut card = Card::apply(Uuid::new_v4(), dec!(1200));
        assert_eq!(card.status, CardStatus::Pending);
        assert!(!card.is_reviewed());

        card.decline("salary not verifiable");
        assert!(card.is_reviewed());
        assert_eq!(card.decline_reason.as_deref(), Some("salary not verifiable"));

        card.approve();
        assert_eq!(card.status, CardStatus::Approved);
        assert_eq!(card.decline_reason, None);
    }
}

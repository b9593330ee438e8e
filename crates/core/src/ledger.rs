//! # Ledger Module
//!
//! Pure part of a transfer: validate the amount against the sender, build the
//! DEBIT/CREDIT pair and compute both post-transfer balances. Persisting the
//! plan atomically is the business layer's job.

use crate::account::Account;
use crate::error::{CoreError, CoreResult};
use crate::money;
use crate::transaction::Transaction;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Reject non-positive amounts and amounts the sender cannot cover.
pub fn ensure_can_send(sender: &Account, amount: Decimal) -> CoreResult<()> {
    money::validate_amount(amount)?;
    if sender.balance < amount {
        return Err(CoreError::InsufficientFunds {
            needed: amount,
            available: sender.balance,
        });
    }
    Ok(())
}

/// A fully computed transfer, ready to be written as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    pub debit: Transaction,
    pub credit: Transaction,
    /// New balance per touched account, each with the balance it was computed
    /// from. A self-transfer touches one account and nets to zero.
    pub balances: Vec<BalanceChange>,
}

/// Old and new balance of one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub account_id: Uuid,
    pub before: Decimal,
    pub after: Decimal,
}

impl TransferPlan {
    /// Build the plan. Currencies are taken from each account as-is; no
    /// conversion happens when they differ.
    pub fn prepare(sender: &Account, recipient: &Account, amount: Decimal) -> CoreResult<Self> {
        ensure_can_send(sender, amount)?;

        let debit = Transaction::debit(sender.id, amount, &sender.currency)
            .with_description(&format!("Transfer to {}", recipient.iban));
        let credit = Transaction::credit(recipient.id, amount, &recipient.currency)
            .with_description(&format!("Transfer from {}", sender.iban));

        let balances = if sender.id == recipient.id {
            vec![BalanceChange {
                account_id: sender.id,
                before: sender.balance,
                after: sender.balance - amount + amount,
            }]
        } else {
            vec![
                BalanceChange {
                    account_id: sender.id,
                    before: sender.balance,
                    after: sender.balance - amount,
                },
                BalanceChange {
                    account_id: recipient.id,
                    before: recipient.balance,
                    after: recipient.balance + amount,
                },
            ]
        };

        Ok(Self {
            debit,
            credit,
            balances,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.debit.amount
    }

    /// Sum of all balance deltas; zero for every valid plan
    pub fn net_change(&self) -> Decimal {
        self.balances.iter().map(|c| c.after - c.before).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountStatus, AccountType};
    use crate::iban::IbanGenerator;
    use crate::transaction::TransactionType;
    use rust_decimal_macros::dec;

    fn account(balance: Decimal, currency: &str) -> Account {
        let mut account = Account::open(
            Uuid::new_v4(),
            currency,
            AccountType::Current,
            AccountStatus::Active,
            &IbanGenerator::new(),
        );
        account.balance = balance;
        account
    }

    #[test]
    fn test_plan_conserves_balance() {
        let sender = account(dec!(1000), "EUR");
        let recipient = account(dec!(50), "EUR");

        let plan = TransferPlan::prepare(&sender, &recipient, dec!(250.75)).unwrap();

        assert_eq!(plan.debit.tx_type, TransactionType::Debit);
        assert_eq!(plan.credit.tx_type, TransactionType::Credit);
        assert_eq!(plan.debit.amount, plan.credit.amount);
        assert_eq!(plan.balances[0].after, dec!(749.25));
        assert_eq!(plan.balances[1].after, dec!(300.75));
        assert_eq!(plan.net_change(), Decimal::ZERO);
    }

    #[test]
    fn test_plan_rejects_overdraft() {
        let sender = account(dec!(10), "EUR");
        let recipient = account(dec!(0), "EUR");

        let err = TransferPlan::prepare(&sender, &recipient, dec!(10.01)).unwrap_err();
        assert!(err.is_insufficient_funds());
    }

    #[test]
    fn test_plan_rejects_non_positive_amount() {
        let sender = account(dec!(10), "EUR");
        let recipient = account(dec!(0), "EUR");

        for amount in [dec!(0), dec!(-1)] {
            let err = TransferPlan::prepare(&sender, &recipient, amount).unwrap_err();
            assert!(matches!(err, CoreError::InvalidAmount(_)));
        }
    }

    #[test]
    fn test_exact_balance_is_allowed() {
        let sender = account(dec!(42), "EUR");
        let recipient = account(dec!(0), "EUR");
        let plan = TransferPlan::prepare(&sender, &recipient, dec!(42)).unwrap();
        assert_eq!(plan.balances[0].after, Decimal::ZERO);
    }

    #[test]
    fn test_currencies_are_not_converted() {
        let sender = account(dec!(100), "EUR");
        let recipient = account(dec!(0), "USD");
        let plan = TransferPlan::prepare(&sender, &recipient, dec!(40)).unwrap();

        assert_eq!(plan.debit.currency, "EUR");
        assert_eq!(plan.credit.currency, "USD");
        assert_eq!(plan.balances[1].after, dec!(40));
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let sender = account(dec!(100), "EUR");
        let plan = TransferPlan::prepare(&sender, &sender, dec!(30)).unwrap();

        assert_eq!(plan.balances.len(), 1);
        assert_eq!(plan.balances[0].after, dec!(100));
        assert_eq!(plan.debit.account_id, plan.credit.account_id);
    }
}

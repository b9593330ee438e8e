//! Ledger engine
//!
//! Transfers between accounts and access to the resulting transactions.
//!
//! A transfer is one unit of work: both ledger lines and both balance writes
//! commit together or not at all. The unit takes the write lock before it
//! reads the balances, so transfers queue behind each other. Balance writes
//! are still compare-and-set against the balance read at the start; a writer
//! that slipped in anyway, or a lock wait that times out, aborts the transfer
//! with `Conflict` instead of losing an update. Nothing is retried; the caller
//! resubmits.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use bankoffice_core::ledger::{self, TransferPlan};
use bankoffice_core::policy::{self, Actor, Operation, Target};
use bankoffice_core::Transaction;
use bankoffice_persistence::{AccountRepo, CardRepo, PersistenceError, TransactionRepo};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

/// A transfer instruction from a sender account
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub recipient_iban: String,
    pub amount: Decimal,
}

/// Ledger Service
pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Move `amount` from `sender_id` to the account holding the recipient
    /// IBAN. Returns the DEBIT line.
    pub async fn transfer(
        &self,
        actor: &Actor,
        sender_id: Uuid,
        request: TransferRequest,
    ) -> BusinessResult<Transaction> {
        let mut tx = self.ctx.db().begin_immediate().await?;

        let sender = match AccountRepo::get_by_id(&mut *tx, sender_id).await {
            Ok(account) => account,
            Err(e) if e.is_not_found() => {
                return Err(BusinessError::not_found("Sender account"))
            }
            Err(e) => return Err(e.into()),
        };

        self.ctx
            .authorize(actor, Operation::Transfer, Target::Owned(sender.owner_id))?;

        // Any card counts, approved or not
        if CardRepo::find_by_account(&mut *tx, sender.id)
            .await?
            .is_none()
        {
            return Err(BusinessError::invalid_state(
                "No linked debit card on sender account",
            ));
        }

        ledger::ensure_can_send(&sender, request.amount)?;

        let recipient = AccountRepo::find_by_iban(&mut *tx, &request.recipient_iban)
            .await?
            .ok_or_else(|| BusinessError::not_found("Recipient account"))?;

        let plan = TransferPlan::prepare(&sender, &recipient, request.amount)?;

        TransactionRepo::insert(&mut *tx, &plan.debit).await?;
        TransactionRepo::insert(&mut *tx, &plan.credit).await?;
        for change in &plan.balances {
            AccountRepo::swap_balance(&mut *tx, change.account_id, change.before, change.after)
                .await?;
        }

        tx.commit().await.map_err(PersistenceError::from)?;

        info!(
            actor = %actor,
            account = %sender.id,
            recipient = %recipient.id,
            amount = %plan.amount(),
            "transfer committed"
        );
        Ok(plan.debit)
    }

    /// CLIENT sees lines on accounts they own; everyone else sees all
    pub async fn list_transactions(&self, actor: &Actor) -> BusinessResult<Vec<Transaction>> {
        self.ctx
            .authorize(actor, Operation::ListTransactions, Target::Collection)?;

        let txs = if policy::is_owner_scoped(actor.role, Operation::ListTransactions) {
            TransactionRepo::get_by_owner(self.ctx.pool(), actor.id).await?
        } else {
            TransactionRepo::get_all(self.ctx.pool()).await?
        };
        Ok(txs)
    }

    pub async fn get_transaction(&self, actor: &Actor, id: Uuid) -> BusinessResult<Transaction> {
        let tx = TransactionRepo::get_by_id(self.ctx.pool(), id).await?;
        let account = AccountRepo::get_by_id(self.ctx.pool(), tx.account_id).await?;
        self.ctx
            .authorize(actor, Operation::ReadTransaction, Target::Owned(account.owner_id))?;
        Ok(tx)
    }

    /// Remove a single ledger line. The sibling line and the balances it
    /// moved are left as they are.
    pub async fn delete_transaction(&self, actor: &Actor, id: Uuid) -> BusinessResult<()> {
        let tx = TransactionRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::DeleteTransaction, Target::Collection)?;

        TransactionRepo::delete(self.ctx.pool(), id).await?;
        warn!(
            actor = %actor,
            account = %tx.account_id,
            amount = %tx.amount,
            tx_type = %tx.tx_type,
            "transaction deleted without compensation"
        );
        Ok(())
    }
}

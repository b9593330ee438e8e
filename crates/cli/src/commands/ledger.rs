//! Transfer and transaction commands

use anyhow::Result;
use bankoffice_business::{Actor, LedgerService, ServiceContext, TransferRequest};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::Config;
use crate::output;
use crate::TxAction;

/// Transfer `amount` from `account_id` to the account with IBAN `to`
pub async fn transfer(
    ctx: &ServiceContext,
    config: &Config,
    actor: &Actor,
    account_id: Uuid,
    to: &str,
    amount: Decimal,
) -> Result<()> {
    let debit = LedgerService::new(ctx)
        .transfer(
            actor,
            account_id,
            TransferRequest {
                recipient_iban: to.trim().to_uppercase(),
                amount,
            },
        )
        .await?;

    if !config.json {
        println!("✅ Transferred {} {} to {}", debit.amount, debit.currency, to);
    }
    output::one(config.json, &debit)
}

/// Handle tx subcommands
pub async fn handle(
    ctx: &ServiceContext,
    config: &Config,
    actor: &Actor,
    action: TxAction,
) -> Result<()> {
    let ledger = LedgerService::new(ctx);

    match action {
        TxAction::List => {
            let list = ledger.list_transactions(actor).await?;
            output::many(config.json, &list, "No transactions found.")?;
        }
        TxAction::Show { tx_id } => {
            let tx = ledger.get_transaction(actor, tx_id).await?;
            output::one(config.json, &tx)?;
        }
        TxAction::Delete { tx_id } => {
            ledger.delete_transaction(actor, tx_id).await?;
            println!("🗑️  Transaction {} deleted", tx_id);
        }
    }

    Ok(())
}

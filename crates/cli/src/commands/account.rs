//! Account management commands

use anyhow::Result;
use bankoffice_business::{AccountService, AccountUpdate, Actor, NewAccount, ServiceContext};

use crate::config::Config;
use crate::output;
use crate::AccountAction;

/// Handle account subcommands
pub async fn handle(
    ctx: &ServiceContext,
    config: &Config,
    actor: &Actor,
    action: AccountAction,
) -> Result<()> {
    let accounts = AccountService::new(ctx);

    match action {
        AccountAction::Request {
            owner,
            currency,
            account_type,
        } => {
            let spec = NewAccount {
                currency,
                account_type: account_type.to_core(),
            };
            let account = accounts
                .request_account(actor, owner.unwrap_or(actor.id), spec)
                .await?;
            output::one(config.json, &account)?;
        }
        AccountAction::AdminCreate {
            owner,
            currency,
            account_type,
        } => {
            let spec = NewAccount {
                currency,
                account_type: account_type.to_core(),
            };
            let account = accounts.admin_create_account(actor, owner, spec).await?;
            output::one(config.json, &account)?;
        }
        AccountAction::Show { account_id } => {
            let account = accounts.get_account(actor, account_id).await?;
            output::one(config.json, &account)?;
        }
        AccountAction::List { owner } => {
            let list = match owner {
                Some(owner_id) => accounts.list_accounts_for_owner(actor, owner_id).await?,
                None => accounts.list_accounts(actor).await?,
            };
            output::many(config.json, &list, "No accounts found.")?;
        }
        AccountAction::Update {
            account_id,
            balance,
            status,
            account_type,
        } => {
            let update = AccountUpdate {
                balance,
                status: status.map(|s| s.to_core()),
                account_type: account_type.map(|t| t.to_core()),
            };
            let account = accounts.update_account(actor, account_id, update).await?;
            output::one(config.json, &account)?;
        }
        AccountAction::Activate { account_id } => {
            let account = accounts.activate(actor, account_id).await?;
            output::one(config.json, &account)?;
        }
        AccountAction::Decline { account_id } => {
            let account = accounts.decline(actor, account_id).await?;
            output::one(config.json, &account)?;
        }
        AccountAction::Delete { account_id } => {
            accounts.delete_account(actor, account_id).await?;
            println!("🗑️  Account {} deleted", account_id);
        }
    }

    Ok(())
}

//! Debit-card commands

use anyhow::Result;
use bankoffice_business::{Actor, CardService, ServiceContext};
use bankoffice_core::CardStatus;

use crate::config::Config;
use crate::output;
use crate::CardAction;

/// Handle card subcommands
pub async fn handle(
    ctx: &ServiceContext,
    config: &Config,
    actor: &Actor,
    action: CardAction,
) -> Result<()> {
    let cards = CardService::new(ctx);

    match action {
        CardAction::Request { account_id, salary } => {
            let card = cards.request_card(actor, account_id, salary).await?;
            output::one(config.json, &card)?;
        }
        CardAction::Approve { card_id } => {
            let card = cards.approve(actor, card_id).await?;
            output::one(config.json, &card)?;
        }
        CardAction::Decline { card_id, reason } => {
            // A missing reason is rejected by the service, not by clap
            let card = cards
                .review_card(actor, card_id, CardStatus::Declined, reason.as_deref())
                .await?;
            output::one(config.json, &card)?;
        }
        CardAction::Show { card_id } => {
            let card = cards.get_card(actor, card_id).await?;
            output::one(config.json, &card)?;
        }
        CardAction::List => {
            let list = cards.list_cards(actor).await?;
            output::many(config.json, &list, "No cards found.")?;
        }
        CardAction::Delete { card_id } => {
            cards.delete_card(actor, card_id).await?;
            println!("🗑️  Card {} deleted", card_id);
        }
    }

    Ok(())
}

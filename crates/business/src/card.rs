//! Card registry
//!
//! Debit-card applications: a client applies against an active current
//! account, a banker approves or declines exactly once.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use bankoffice_core::policy::{Actor, Operation, Target};
use bankoffice_core::{Card, CardStatus, MIN_MONTHLY_SALARY};
use bankoffice_persistence::{AccountRepo, CardRepo};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

/// Card Service
pub struct CardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply for a debit card on `account_id`.
    ///
    /// Checks run in this order: role, salary threshold, account exists,
    /// account eligible, account owned by the actor, no card yet.
    pub async fn request_card(
        &self,
        actor: &Actor,
        account_id: Uuid,
        monthly_salary: Decimal,
    ) -> BusinessResult<Card> {
        self.ctx
            .authorize(actor, Operation::RequestCard, Target::Collection)?;

        if monthly_salary < MIN_MONTHLY_SALARY {
            return Err(BusinessError::invalid_request(&format!(
                "Cannot apply for debit card: monthly salary must be at least {}€.",
                MIN_MONTHLY_SALARY
            )));
        }

        let account = AccountRepo::get_by_id(self.ctx.pool(), account_id).await?;
        if !account.is_card_eligible() {
            return Err(BusinessError::invalid_request(
                "Account must be an active current account",
            ));
        }
        self.ctx
            .authorize(actor, Operation::RequestCard, Target::Owned(account.owner_id))?;

        if CardRepo::find_by_account(self.ctx.pool(), account_id)
            .await?
            .is_some()
        {
            return Err(BusinessError::conflict(
                "A debit card has already been issued for this account",
            ));
        }

        let card = Card::apply(account_id, monthly_salary);
        CardRepo::insert(self.ctx.pool(), &card).await?;

        info!(actor = %actor, card = %card.id, account = %account_id, "card requested");
        Ok(card)
    }

    /// Approve or decline a pending card. A decline needs a non-blank reason.
    pub async fn review_card(
        &self,
        actor: &Actor,
        card_id: Uuid,
        status: CardStatus,
        decline_reason: Option<&str>,
    ) -> BusinessResult<Card> {
        self.ctx
            .authorize(actor, Operation::ReviewCard, Target::Collection)?;

        let mut card = CardRepo::get_by_id(self.ctx.pool(), card_id).await?;
        if card.is_reviewed() {
            return Err(BusinessError::invalid_state("Card has already been reviewed"));
        }

        match status {
            CardStatus::Approved => card.approve(),
            CardStatus::Declined => {
                let reason = decline_reason
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .ok_or_else(|| {
                        BusinessError::invalid_request("Decline reason must be provided")
                    })?;
                card.decline(reason);
            }
            CardStatus::Pending => {
                return Err(BusinessError::invalid_request(
                    "Review outcome must be APPROVED or DECLINED",
                ))
            }
        }

        // Lost a race with another reviewer
        if !CardRepo::review(self.ctx.pool(), &card).await? {
            return Err(BusinessError::invalid_state("Card has already been reviewed"));
        }

        info!(actor = %actor, card = %card.id, status = %card.status, "card reviewed");
        Ok(card)
    }

    pub async fn approve(&self, actor: &Actor, card_id: Uuid) -> BusinessResult<Card> {
        self.review_card(actor, card_id, CardStatus::Approved, None)
            .await
    }

    pub async fn decline(&self, actor: &Actor, card_id: Uuid, reason: &str) -> BusinessResult<Card> {
        self.review_card(actor, card_id, CardStatus::Declined, Some(reason))
            .await
    }

    pub async fn get_card(&self, actor: &Actor, card_id: Uuid) -> BusinessResult<Card> {
        let card = CardRepo::get_by_id(self.ctx.pool(), card_id).await?;
        let account = AccountRepo::get_by_id(self.ctx.pool(), card.account_id).await?;
        self.ctx
            .authorize(actor, Operation::ReadCard, Target::Owned(account.owner_id))?;
        Ok(card)
    }

    pub async fn list_cards(&self, actor: &Actor) -> BusinessResult<Vec<Card>> {
        self.ctx
            .authorize(actor, Operation::ListCards, Target::Collection)?;
        Ok(CardRepo::get_all(self.ctx.pool()).await?)
    }

    pub async fn delete_card(&self, actor: &Actor, card_id: Uuid) -> BusinessResult<()> {
        self.ctx
            .authorize(actor, Operation::DeleteCard, Target::Collection)?;

        CardRepo::delete(self.ctx.pool(), card_id).await?;
        info!(actor = %actor, card = %card_id, "card deleted");
        Ok(())
    }
}

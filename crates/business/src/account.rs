//! Account registry
//!
//! Opening accounts (client request or admin direct-create), reading, listing,
//! banker-only field and status updates, and deletion.
//!
//! Status changes are not checked against the PENDING precondition: a banker
//! may force any status.

use crate::error::BusinessResult;
use crate::services::ServiceContext;
use bankoffice_core::money::Currency;
use bankoffice_core::policy::{Actor, Operation, Target};
use bankoffice_core::{Account, AccountStatus, AccountType};
use bankoffice_persistence::{AccountRepo, UserRepo};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

/// Parameters for opening an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub currency: String,
    pub account_type: AccountType,
}

impl Default for NewAccount {
    fn default() -> Self {
        Self {
            currency: Currency::default().code,
            account_type: AccountType::Current,
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub balance: Option<Decimal>,
    pub status: Option<AccountStatus>,
    pub account_type: Option<AccountType>,
}

/// Account Service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// ADMIN opens an account that is ACTIVE immediately
    pub async fn admin_create_account(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        spec: NewAccount,
    ) -> BusinessResult<Account> {
        self.ctx
            .authorize(actor, Operation::AdminCreateAccount, Target::Owned(owner_id))?;
        self.open(actor, owner_id, spec, AccountStatus::Active).await
    }

    /// CLIENT asks for an account of their own; it starts PENDING
    pub async fn request_account(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        spec: NewAccount,
    ) -> BusinessResult<Account> {
        self.ctx
            .authorize(actor, Operation::RequestAccount, Target::Owned(owner_id))?;
        self.open(actor, owner_id, spec, AccountStatus::Pending).await
    }

    async fn open(
        &self,
        actor: &Actor,
        owner_id: Uuid,
        spec: NewAccount,
        status: AccountStatus,
    ) -> BusinessResult<Account> {
        let currency = Currency::parse_code(&spec.currency)?;
        UserRepo::get_by_id(self.ctx.pool(), owner_id).await?;

        let account = Account::open(
            owner_id,
            &currency,
            spec.account_type,
            status,
            self.ctx.ibans(),
        );
        AccountRepo::insert(self.ctx.pool(), &account).await?;

        info!(
            actor = %actor,
            account = %account.id,
            iban = %account.iban,
            status = %account.status,
            "account opened"
        );
        Ok(account)
    }

    pub async fn get_account(&self, actor: &Actor, id: Uuid) -> BusinessResult<Account> {
        let account = AccountRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::ReadAccount, Target::Owned(account.owner_id))?;
        Ok(account)
    }

    pub async fn list_accounts(&self, actor: &Actor) -> BusinessResult<Vec<Account>> {
        self.ctx
            .authorize(actor, Operation::ListAccounts, Target::Collection)?;
        Ok(AccountRepo::get_all(self.ctx.pool()).await?)
    }

    /// Accounts owned by `owner_id`, subject to the read rule for that owner
    pub async fn list_accounts_for_owner(
        &self,
        actor: &Actor,
        owner_id: Uuid,
    ) -> BusinessResult<Vec<Account>> {
        self.ctx
            .authorize(actor, Operation::ReadAccount, Target::Owned(owner_id))?;
        Ok(AccountRepo::get_by_owner(self.ctx.pool(), owner_id).await?)
    }

    pub async fn update_account(
        &self,
        actor: &Actor,
        id: Uuid,
        update: AccountUpdate,
    ) -> BusinessResult<Account> {
        let mut account = AccountRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::UpdateAccount, Target::Owned(account.owner_id))?;

        if let Some(balance) = update.balance {
            account.balance = balance;
        }
        if let Some(status) = update.status {
            account.status = status;
        }
        if let Some(account_type) = update.account_type {
            account.account_type = account_type;
        }

        AccountRepo::update(self.ctx.pool(), &account).await?;
        info!(actor = %actor, account = %account.id, "account updated");
        Ok(account)
    }

    pub async fn set_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: AccountStatus,
    ) -> BusinessResult<Account> {
        let mut account = AccountRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::SetAccountStatus, Target::Owned(account.owner_id))?;

        AccountRepo::update_status(self.ctx.pool(), id, status).await?;
        account.status = status;
        info!(actor = %actor, account = %id, %status, "account status changed");
        Ok(account)
    }

    pub async fn activate(&self, actor: &Actor, id: Uuid) -> BusinessResult<Account> {
        self.set_status(actor, id, AccountStatus::Active).await
    }

    pub async fn decline(&self, actor: &Actor, id: Uuid) -> BusinessResult<Account> {
        self.set_status(actor, id, AccountStatus::Declined).await
    }

    /// Removes the account together with its card and transactions
    pub async fn delete_account(&self, actor: &Actor, id: Uuid) -> BusinessResult<()> {
        let account = AccountRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::DeleteAccount, Target::Owned(account.owner_id))?;

        AccountRepo::delete(self.ctx.pool(), id).await?;
        info!(actor = %actor, account = %id, "account deleted");
        Ok(())
    }
}

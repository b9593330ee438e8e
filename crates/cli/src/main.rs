//! Bankoffice CLI - back-office operations from the command line
//!
//! Usage:
//! ```bash
//! bankoffice init
//! bankoffice bootstrap-admin --username root --email root@bank.test --password s3cret
//! export BANKOFFICE_TOKEN=$(bankoffice login --username root --password s3cret)
//! bankoffice user create --username bob --email bob@bank.test --password pw --role banker
//! bankoffice account request --owner <user_id> --type current
//! bankoffice card request <account_id> --salary 1200
//! bankoffice transfer <account_id> --to DE89370400440532013000 --amount 25.50
//! bankoffice tx list
//! ```
//!
//! Client errors (bad input, denied access, missing records) exit with code 2;
//! internal faults exit with code 1.

use anyhow::Result;
use bankoffice_business::BusinessError;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

mod commands;
mod config;
mod db;
mod output;

use commands::{account, auth, card, ledger, user};
use config::Config;

/// Bankoffice - role-based banking back-office
#[derive(Parser)]
#[command(name = "bankoffice")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, env = "BANKOFFICE_DB", default_value = "data/bankoffice.db", global = true)]
    pub db: PathBuf,

    /// Bearer token of the acting user (from `bankoffice login`)
    #[arg(long, env = "BANKOFFICE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Hex-encoded 32-byte seed for the token signing key
    #[arg(long, env = "BANKOFFICE_SECRET_KEY", global = true, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Lifetime of issued access tokens
    #[arg(long, env = "BANKOFFICE_TOKEN_TTL_MINUTES", default_value_t = 60, global = true)]
    pub token_ttl_minutes: i64,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database with schema
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Create the first ADMIN user
    BootstrapAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Exchange credentials for an access token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// User management
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Debit-card applications
    Card {
        #[command(subcommand)]
        action: CardAction,
    },

    /// Transfer money from an account to an IBAN
    Transfer {
        /// Sender account ID
        account_id: Uuid,
        /// Recipient IBAN
        #[arg(long)]
        to: String,
        /// Amount to transfer
        #[arg(long)]
        amount: Decimal,
    },

    /// Ledger transactions
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user (BANKER creates clients, ADMIN creates bankers)
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    /// List visible users
    List,
    /// Show a user
    Show { user_id: Uuid },
    /// Update fields of a user
    Update {
        user_id: Uuid,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Only applied for ADMIN actors
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Delete a user
    Delete { user_id: Uuid },
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Request a new account (CLIENT, for themselves; starts PENDING)
    Request {
        /// Owner user ID (defaults to the acting user)
        #[arg(long)]
        owner: Option<Uuid>,
        #[arg(long, default_value = "EUR")]
        currency: String,
        #[arg(long = "type", value_enum, default_value = "current")]
        account_type: AccountTypeArg,
    },
    /// Open an ACTIVE account directly (ADMIN)
    AdminCreate {
        #[arg(long)]
        owner: Uuid,
        #[arg(long, default_value = "EUR")]
        currency: String,
        #[arg(long = "type", value_enum, default_value = "current")]
        account_type: AccountTypeArg,
    },
    /// Show account details
    Show { account_id: Uuid },
    /// List accounts (all, or one owner's)
    List {
        #[arg(long)]
        owner: Option<Uuid>,
    },
    /// Update account fields (BANKER)
    Update {
        account_id: Uuid,
        #[arg(long)]
        balance: Option<Decimal>,
        #[arg(long, value_enum)]
        status: Option<AccountStatusArg>,
        #[arg(long = "type", value_enum)]
        account_type: Option<AccountTypeArg>,
    },
    /// Mark an account ACTIVE (BANKER)
    Activate { account_id: Uuid },
    /// Mark an account DECLINED (BANKER)
    Decline { account_id: Uuid },
    /// Delete an account with its card and transactions
    Delete { account_id: Uuid },
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Apply for a debit card (CLIENT)
    Request {
        account_id: Uuid,
        /// Monthly salary in the account currency
        #[arg(long)]
        salary: Decimal,
    },
    /// Approve a pending card (BANKER)
    Approve { card_id: Uuid },
    /// Decline a pending card (BANKER)
    Decline {
        card_id: Uuid,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Show a card
    Show { card_id: Uuid },
    /// List all cards
    List,
    /// Delete a card application
    Delete { card_id: Uuid },
}

#[derive(Subcommand)]
pub enum TxAction {
    /// List visible transactions
    List,
    /// Show a transaction
    Show { tx_id: Uuid },
    /// Delete a single transaction line
    Delete { tx_id: Uuid },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Banker,
    Client,
}

impl RoleArg {
    pub fn to_core(self) -> bankoffice_core::Role {
        match self {
            RoleArg::Admin => bankoffice_core::Role::Admin,
            RoleArg::Banker => bankoffice_core::Role::Banker,
            RoleArg::Client => bankoffice_core::Role::Client,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AccountTypeArg {
    Current,
    Savings,
}

impl AccountTypeArg {
    pub fn to_core(self) -> bankoffice_core::AccountType {
        match self {
            AccountTypeArg::Current => bankoffice_core::AccountType::Current,
            AccountTypeArg::Savings => bankoffice_core::AccountType::Savings,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AccountStatusArg {
    Pending,
    Active,
    Declined,
}

impl AccountStatusArg {
    pub fn to_core(self) -> bankoffice_core::AccountStatus {
        match self {
            AccountStatusArg::Pending => bankoffice_core::AccountStatus::Pending,
            AccountStatusArg::Active => bankoffice_core::AccountStatus::Active,
            AccountStatusArg::Declined => bankoffice_core::AccountStatus::Declined,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let client_error = err
                .downcast_ref::<BusinessError>()
                .map(BusinessError::is_client_error)
                .unwrap_or(false);
            if client_error {
                eprintln!("❌ {}", err);
                ExitCode::from(2)
            } else {
                eprintln!("❌ {:#}", err);
                ExitCode::from(1)
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli);

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&config.db_path, force).await?;
            println!("✅ Database initialized at {:?}", config.db_path);
        }

        Commands::Status => {
            db::show_status(&config.db_path).await?;
        }

        Commands::BootstrapAdmin {
            username,
            email,
            password,
        } => {
            let ctx = config.context().await?;
            auth::bootstrap_admin(&ctx, &config, &username, &email, &password).await?;
        }

        Commands::Login { username, password } => {
            let ctx = config.context().await?;
            auth::login(&ctx, &username, &password).await?;
        }

        Commands::User { action } => {
            let ctx = config.context().await?;
            let actor = config.actor(&ctx).await?;
            user::handle(&ctx, &config, &actor, action).await?;
        }

        Commands::Account { action } => {
            let ctx = config.context().await?;
            let actor = config.actor(&ctx).await?;
            account::handle(&ctx, &config, &actor, action).await?;
        }

        Commands::Card { action } => {
            let ctx = config.context().await?;
            let actor = config.actor(&ctx).await?;
            card::handle(&ctx, &config, &actor, action).await?;
        }

        Commands::Transfer {
            account_id,
            to,
            amount,
        } => {
            let ctx = config.context().await?;
            let actor = config.actor(&ctx).await?;
            ledger::transfer(&ctx, &config, &actor, account_id, &to, amount).await?;
        }

        Commands::Tx { action } => {
            let ctx = config.context().await?;
            let actor = config.actor(&ctx).await?;
            ledger::handle(&ctx, &config, &actor, action).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_transfer_args() {
        let cli = Cli::try_parse_from([
            "bankoffice",
            "transfer",
            "7f1c8a52-3c1e-4a5b-9f10-0d6e2b9c4a11",
            "--to",
            "NL91ABNA0417164300",
            "--amount",
            "12.50",
        ])
        .unwrap();
        match cli.command {
            Commands::Transfer { to, amount, .. } => {
                assert_eq!(to, "NL91ABNA0417164300");
                assert_eq!(amount.to_string(), "12.50");
            }
            _ => panic!("expected transfer"),
        }
    }

    #[test]
    fn test_bad_uuid_rejected() {
        assert!(Cli::try_parse_from(["bankoffice", "account", "show", "nope"]).is_err());
    }
}

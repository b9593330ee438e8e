//! Repository implementations for SQLite
//!
//! CRUD operations for every table. Each function takes any sqlx executor, so
//! the same call works on the pool (`db.pool()`) or inside a unit of work
//! (`&mut *tx`).

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use bankoffice_core::{Account, AccountStatus, Card, Role, Transaction, User};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

fn collect<R, T>(rows: Vec<R>) -> PersistenceResult<Vec<T>>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// ============================================================================
// User Repository
// ============================================================================

/// Repository for the users table
pub struct UserRepo;

impl UserRepo {
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<User>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("User", &id.to_string()))?
            .try_into()
    }

    pub async fn find_by_username<'e, E>(executor: E, username: &str) -> PersistenceResult<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(executor)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> PersistenceResult<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(executor)
            .await?
            .map(User::try_from)
            .transpose()
    }

    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(executor)
            .await?;
        collect(rows)
    }

    pub async fn count_by_role<'e, E>(executor: E, role: Role) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role.as_str())
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    pub async fn insert<'e, E>(executor: E, user: &User) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = UserRow::from(user);
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.username)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.role)
        .bind(row.created_at)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_write)?;
        Ok(())
    }

    pub async fn update<'e, E>(executor: E, user: &User) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, role = ? WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.id.to_string())
        .execute(executor)
        .await
        .map_err(PersistenceError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("User", &user.id.to_string()));
        }
        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("User", &id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository for the accounts table
pub struct AccountRepo;

impl AccountRepo {
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Account>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", &id.to_string()))?
            .try_into()
    }

    pub async fn find_by_iban<'e, E>(executor: E, iban: &str) -> PersistenceResult<Option<Account>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE iban = ?")
            .bind(iban)
            .fetch_optional(executor)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    pub async fn get_by_owner<'e, E>(executor: E, owner_id: Uuid) -> PersistenceResult<Vec<Account>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE owner_id = ? ORDER BY created_at",
        )
        .bind(owner_id.to_string())
        .fetch_all(executor)
        .await?;
        collect(rows)
    }

    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Account>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts ORDER BY created_at")
            .fetch_all(executor)
            .await?;
        collect(rows)
    }

    pub async fn insert<'e, E>(executor: E, account: &Account) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = AccountRow::from(account);
        sqlx::query(
            r#"
            INSERT INTO accounts (id, iban, balance, currency, status, account_type, owner_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.iban)
        .bind(&row.balance)
        .bind(&row.currency)
        .bind(&row.status)
        .bind(&row.account_type)
        .bind(&row.owner_id)
        .bind(row.created_at)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_write)?;
        Ok(())
    }

    /// Write every mutable field (balance, status, type)
    pub async fn update<'e, E>(executor: E, account: &Account) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE accounts SET balance = ?, currency = ?, status = ?, account_type = ? WHERE id = ?",
        )
        .bind(account.balance.to_string())
        .bind(&account.currency)
        .bind(account.status.as_str())
        .bind(account.account_type.as_str())
        .bind(account.id.to_string())
        .execute(executor)
        .await
        .map_err(PersistenceError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", &account.id.to_string()));
        }
        Ok(())
    }

    pub async fn update_status<'e, E>(
        executor: E,
        id: Uuid,
        status: AccountStatus,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE accounts SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", &id.to_string()));
        }
        Ok(())
    }

    /// Compare-and-set the balance: only writes if the stored balance still
    /// equals `expected`.
    pub async fn swap_balance<'e, E>(
        executor: E,
        id: Uuid,
        expected: Decimal,
        new_balance: Decimal,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE accounts SET balance = ? WHERE id = ? AND balance = ?")
            .bind(new_balance.to_string())
            .bind(id.to_string())
            .bind(expected.to_string())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::stale_write("Account", &id.to_string()));
        }
        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", &id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Card Repository
// ============================================================================

/// Repository for the cards table
pub struct CardRepo;

impl CardRepo {
    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Card>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CardRow>("SELECT * FROM cards WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Card", &id.to_string()))?
            .try_into()
    }

    pub async fn find_by_account<'e, E>(executor: E, account_id: Uuid) -> PersistenceResult<Option<Card>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, CardRow>("SELECT * FROM cards WHERE account_id = ?")
            .bind(account_id.to_string())
            .fetch_optional(executor)
            .await?
            .map(Card::try_from)
            .transpose()
    }

    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Card>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, CardRow>("SELECT * FROM cards ORDER BY created_at")
            .fetch_all(executor)
            .await?;
        collect(rows)
    }

    pub async fn insert<'e, E>(executor: E, card: &Card) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = CardRow::from(card);
        sqlx::query(
            r#"
            INSERT INTO cards (id, account_id, monthly_salary, status, decline_reason, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.account_id)
        .bind(&row.monthly_salary)
        .bind(&row.status)
        .bind(&row.decline_reason)
        .bind(row.created_at)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_write)?;
        Ok(())
    }

    /// Record a review outcome, but only while the card is still PENDING.
    /// Returns false when the card had already been reviewed.
    pub async fn review<'e, E>(executor: E, card: &Card) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE cards SET status = ?, decline_reason = ? WHERE id = ? AND status = 'PENDING'",
        )
        .bind(card.status.as_str())
        .bind(&card.decline_reason)
        .bind(card.id.to_string())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM cards WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Card", &id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Repository for the transactions table
pub struct TransactionRepo;

impl TransactionRepo {
    pub async fn insert<'e, E>(executor: E, tx: &Transaction) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = TransactionRow::from(tx);
        sqlx::query(
            r#"
            INSERT INTO transactions (id, account_id, amount, currency, tx_type, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.account_id)
        .bind(&row.amount)
        .bind(&row.currency)
        .bind(&row.tx_type)
        .bind(&row.description)
        .bind(row.created_at)
        .execute(executor)
        .await
        .map_err(PersistenceError::from_write)?;
        Ok(())
    }

    pub async fn get_by_id<'e, E>(executor: E, id: Uuid) -> PersistenceResult<Transaction>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, TransactionRow>("SELECT * FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Transaction", &id.to_string()))?
            .try_into()
    }

    pub async fn get_by_account<'e, E>(executor: E, account_id: Uuid) -> PersistenceResult<Vec<Transaction>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE account_id = ? ORDER BY created_at",
        )
        .bind(account_id.to_string())
        .fetch_all(executor)
        .await?;
        collect(rows)
    }

    /// Transactions on every account owned by `owner_id`
    pub async fn get_by_owner<'e, E>(executor: E, owner_id: Uuid) -> PersistenceResult<Vec<Transaction>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT t.* FROM transactions t
            JOIN accounts a ON t.account_id = a.id
            WHERE a.owner_id = ?
            ORDER BY t.created_at
            "#,
        )
        .bind(owner_id.to_string())
        .fetch_all(executor)
        .await?;
        collect(rows)
    }

    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Transaction>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>("SELECT * FROM transactions ORDER BY created_at")
            .fetch_all(executor)
            .await?;
        collect(rows)
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Transaction", &id.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Open a pool on an existing database
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    Ok(pool)
}

/// Run embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Create the database file if missing and bring the schema up to date
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options).await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// A single connection that never expires: every SQLite `:memory:`
/// connection is its own database.
pub async fn in_memory_database() -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

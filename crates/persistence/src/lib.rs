//! # Bankoffice Persistence
//!
//! SQLite storage for users, accounts, debit cards and ledger transactions.
//!
//! Every repository function takes a sqlx executor. Pass `db.pool()` for
//! one-off reads and writes, or `&mut *tx` from [`Database::begin_immediate`] when
//! several writes must land together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bankoffice_persistence::{AccountRepo, Database};
//!
//! let db = Database::init("sqlite:data/bankoffice.db").await?;
//!
//! let accounts = AccountRepo::get_all(db.pool()).await?;
//!
//! let mut tx = db.begin_immediate().await?;
//! AccountRepo::swap_balance(&mut *tx, id, old, new).await?;
//! tx.commit().await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::schema::{AccountRow, CardRow, TransactionRow, UserRow};
pub use sqlite::{
    in_memory_database, init_database, run_migrations, AccountRepo, CardRepo, TransactionRepo,
    UserRepo,
};

use sqlx::{Sqlite, SqlitePool};

/// Row counts per table, for status reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub users: i64,
    pub accounts: i64,
    pub cards: i64,
    pub transactions: i64,
}

/// Database facade over the SQLite pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to an existing database without touching the schema
    ///
    /// # Arguments
    /// * `db_url` - SQLite database URL (e.g., "sqlite:bankoffice.db")
    pub async fn connect(db_url: &str) -> PersistenceResult<Self> {
        let pool = sqlite::create_pool(db_url).await?;
        Ok(Self { pool })
    }

    /// Create the database if needed and apply migrations
    pub async fn init(db_url: &str) -> PersistenceResult<Self> {
        let pool = init_database(db_url).await?;
        Ok(Self { pool })
    }

    /// Fresh private database, used by tests and dry runs
    pub async fn in_memory() -> PersistenceResult<Self> {
        let pool = in_memory_database().await?;
        Ok(Self { pool })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a unit of work that holds the write lock from its first
    /// statement. Dropping it without `commit` rolls back. Use it when rows are read and then written back: a second
    /// writer waits out the busy timeout here instead of failing at its
    /// first write.
    pub async fn begin_immediate(&self) -> PersistenceResult<sqlx::Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    pub async fn counts(&self) -> PersistenceResult<TableCounts> {
        let (users, accounts, cards, transactions): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM accounts),
                (SELECT COUNT(*) FROM cards),
                (SELECT COUNT(*) FROM transactions)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(TableCounts {
            users,
            accounts,
            cards,
            transactions,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

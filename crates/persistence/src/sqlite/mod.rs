//! SQLite persistence module
//!
//! Repository pattern for SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, in_memory_database, init_database, run_migrations, AccountRepo, CardRepo,
    TransactionRepo, UserRepo,
};
pub use schema::{AccountRow, CardRow, TransactionRow, UserRow};

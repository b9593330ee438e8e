//! Database initialization and status

use anyhow::{bail, Context, Result};
use bankoffice_persistence::Database;
use std::path::{Path, PathBuf};

/// Journal files SQLite keeps next to the database
fn sidecar_paths(db_path: &Path) -> [PathBuf; 3] {
    ["-wal", "-shm", "-journal"].map(|suffix| {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    })
}

fn database_url(db_path: &Path) -> String {
    format!("sqlite:{}", db_path.display())
}

/// Create the database file and apply migrations
pub async fn init_database(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        for sidecar in sidecar_paths(db_path) {
            if sidecar.exists() {
                std::fs::remove_file(&sidecar)
                    .with_context(|| format!("Failed to remove {:?}", sidecar))?;
            }
        }
        println!("🗑️  Removed existing database");
    }

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create data directory")?;
    }

    let db = Database::init(&database_url(db_path))
        .await
        .context("Failed to initialize database")?;
    db.close().await;
    Ok(())
}

/// Open an initialized database
pub async fn connect(db_path: &Path) -> Result<Database> {
    if !db_path.exists() {
        bail!(
            "Database not found at {:?}. Run 'bankoffice init' first.",
            db_path
        );
    }
    Database::connect(&database_url(db_path))
        .await
        .context("Failed to connect to database")
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'bankoffice init' to create the database");
        return Ok(());
    }

    let db = connect(db_path).await?;
    let counts = db.counts().await.context("Failed to count records")?;

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();
    println!("   Users:        {}", counts.users);
    println!("   Accounts:     {}", counts.accounts);
    println!("   Cards:        {}", counts.cards);
    println!("   Transactions: {}", counts.transactions);

    db.close().await;
    Ok(())
}

//! Database access for moodly-fr
//!
//! The service never writes: every connection is opened with `mode=ro`.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

/// Open the shared database read-only
///
/// Fails if the database has not been created yet by the main app.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nStart the Moodly app once to create it.",
            db_path.display()
        );
    }

    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _moodly_fr_write_probe (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            anyhow::bail!("Database connection at {} is not read-only", db_path.display());
        }
    }

    Ok(pool)
}

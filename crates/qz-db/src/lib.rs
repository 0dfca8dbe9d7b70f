//! Review State Store for QuizAI study mode.
//!
//! [`ReviewStore`] is the storage contract the study session controller talks
//! to. Two backends are provided: [`MemoryReviewStore`] for a single process
//! and [`SqliteReviewStore`] backed by a SQLite database through sqlx.

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod sqlite;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryReviewStore;
pub use sqlite::SqliteReviewStore;
pub use store::ReviewStore;

use anyhow::Context;
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};

/// Create a SQLite connection pool.
///
/// In-memory databases live as long as their connection, so for those the
/// pool keeps one connection open for its whole lifetime. Callers should pass
/// `max_connections = 1` for `sqlite::memory:` so every query sees the same
/// database.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let mut options = SqlitePoolOptions::new().max_connections(max_connections);
    if is_in_memory(database_url) {
        options = options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = options
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Ensure the database exists and run migrations in this crate's `migrations/` folder.
pub async fn ensure_db_and_migrate(database_url: &str, pool: &SqlitePool) -> anyhow::Result<()> {
    // Ensure database file exists (no-op if it already does)
    if !is_in_memory(database_url) {
        let exists = Sqlite::database_exists(database_url).await?;
        if !exists {
            Sqlite::create_database(database_url).await?;
        }
    }

    // Run migrations bundled at compile time from `migrations/`
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run migrations")?;

    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

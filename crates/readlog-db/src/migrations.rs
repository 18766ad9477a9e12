//! # Database Schema
//!
//! The schema is a single embedded migration creating the `books` table.
//! It is applied when the pool is created, before any request can acquire
//! a session.
//!
//! ```text
//! migrations/sqlite/
//! └── 001_create_books.sql   # CREATE TABLE IF NOT EXISTS books (...)
//! ```

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies the schema if it has not been applied yet.
///
/// Safe to run repeatedly: sqlx records applied versions in
/// `_sqlx_migrations`, and the table DDL itself uses `IF NOT EXISTS`.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

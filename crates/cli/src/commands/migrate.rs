//! Database migration command.
//!
//! Applies the migrations embedded from `crates/api/migrations/`.
//!
//! # Environment Variables
//!
//! - `SHOPSMART_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use shopsmart_api::db;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    pool.close().await;
    Ok(())
}

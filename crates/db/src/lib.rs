//! Persistence layer for the chatwarden moderation system.
//!
//! Repositories are zero-sized structs with async methods that take a
//! `&PgPool` as their first argument. Multi-row invariants (one active
//! document per scope) are preserved inside single transactions; everything
//! else is single-statement.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

//! PostgreSQL persistence for the Gather feedback service.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod gateway;
pub mod models;
pub mod repositories;

pub use error::DbError;
pub use gateway::{
    current_event_analytics, refresh_event_analytics, refresh_stale_for_owner, PgFeedbackGateway,
};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

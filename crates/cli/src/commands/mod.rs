//! CLI subcommands.

pub mod migrate;
pub mod user;

use grocery_web::config::{ConfigError, WebConfig};
use grocery_web::db;
use sqlx::SqlitePool;

/// Errors shared by commands that open the database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Auth(#[from] grocery_web::services::auth::AuthError),
}

/// Load configuration and open a migrated connection pool.
async fn connect() -> Result<SqlitePool, CommandError> {
    let config = WebConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    Ok(pool)
}

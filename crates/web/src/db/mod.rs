//! Database operations for the grocery list SQLite database.
//!
//! ## Tables
//!
//! - `users` - Site accounts (unique username, Argon2 password hash)
//! - `grocery_stores` - Stores and the user who created them
//! - `grocery_items` - Items, each belonging to exactly one store
//! - `shopping_list_items` - Per-user shopping list (user ↔ item join)
//! - `tower_sessions` - Session storage (created by the session store itself)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/`, embedded at compile time
//! and applied on startup by [`run_migrations`]. They can also be applied with:
//! ```bash
//! cargo run -p grocery-cli -- migrate
//! ```

pub mod items;
pub mod shopping_list;
pub mod stores;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use items::ItemRepository;
pub use shopping_list::ShoppingListRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username, missing store).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning constraint violations into `Conflict`.
    pub(crate) fn from_write(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if it does not exist and foreign key
/// enforcement is switched on for every connection.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply all pending schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history diverges.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

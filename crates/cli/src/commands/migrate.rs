//! Database migration command.
//!
//! Migrations are embedded in `grocery-web` and also run when the server
//! starts; this applies them without starting it.

use super::{CommandError, connect};

/// Apply all pending migrations to the configured database.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    pool.close().await;

    tracing::info!("Migrations complete!");
    Ok(())
}

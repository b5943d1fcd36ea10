//! User account commands.

use grocery_web::services::auth::AuthService;

use super::{CommandError, connect};

/// Create a user account through the same service as the sign up form.
///
/// Returns the new user's ID.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the username is invalid or taken, or the
/// password is too weak.
pub async fn create(username: &str, password: &str) -> Result<i64, CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .register_with_password(username, password)
        .await?;

    pool.close().await;
    Ok(user.id.as_i64())
}

//! User domain types.

use chrono::{DateTime, Utc};

use grocery_core::{UserId, Username};

/// A site account (domain type).
///
/// Carries no password hash; that is read only by the authentication service
/// through [`crate::db::UserRepository::get_password_hash`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}

//! Shopping list repository (the user ↔ item join table).
//!
//! Adds and removes are idempotent: the composite primary key turns a repeated
//! add into a no-op, and deleting an absent row simply affects nothing.

use chrono::Utc;
use sqlx::SqlitePool;

use grocery_core::{ItemId, UserId};

use super::RepositoryError;
use crate::models::item::ItemSummary;

/// Repository for per-user shopping lists.
pub struct ShoppingListRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShoppingListRepository<'a> {
    /// Create a new shopping list repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an item to a user's list.
    ///
    /// Returns `true` if the item was added, `false` if it was already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user or item does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT OR IGNORE INTO shopping_list_items (user_id, item_id, added_at)
            VALUES (?, ?, ?)
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "user or item does not exist"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove an item from a user's list.
    ///
    /// Returns `true` if the item was removed, `false` if it was not on the list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shopping_list_items
            WHERE user_id = ? AND item_id = ?
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether an item is on a user's list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains(&self, user_id: UserId, item_id: ItemId) -> Result<bool, RepositoryError> {
        let found: Option<i64> = sqlx::query_scalar(
            r"
            SELECT 1 FROM shopping_list_items
            WHERE user_id = ? AND item_id = ?
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// A user's list, oldest addition first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ItemSummary>, RepositoryError> {
        let items = sqlx::query_as::<_, ItemSummary>(
            r"
            SELECT i.id, i.name, i.price, i.category, i.store_id, s.title AS store_title
            FROM shopping_list_items l
            JOIN grocery_items i ON i.id = l.item_id
            JOIN grocery_stores s ON s.id = i.store_id
            WHERE l.user_id = ?
            ORDER BY l.added_at, i.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

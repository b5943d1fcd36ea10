//! Grocery item repository.

use chrono::Utc;
use sqlx::SqlitePool;

use grocery_core::{ItemId, StoreId, UserId};

use super::RepositoryError;
use crate::models::item::{GroceryItem, ItemSummary, NewItem};

const ITEM_COLUMNS: &str =
    "id, name, price, category, photo_url, store_id, created_by_id, created_at, updated_at";

/// Repository for grocery item database operations.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or a stored
    /// price/category cannot be decoded.
    pub async fn get_by_id(&self, id: ItemId) -> Result<Option<GroceryItem>, RepositoryError> {
        let item = sqlx::query_as::<_, GroceryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM grocery_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// List the items sold at a store, alphabetically by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<ItemSummary>, RepositoryError> {
        let items = sqlx::query_as::<_, ItemSummary>(
            r"
            SELECT i.id, i.name, i.price, i.category, i.store_id, s.title AS store_title
            FROM grocery_items i
            JOIN grocery_stores s ON s.id = i.store_id
            WHERE i.store_id = ?
            ORDER BY i.name COLLATE NOCASE, i.id
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Create an item owned by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store (or creator) does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        item: &NewItem,
        created_by: UserId,
    ) -> Result<GroceryItem, RepositoryError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, GroceryItem>(&format!(
            r"
            INSERT INTO grocery_items
                (name, price, category, photo_url, store_id, created_by_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(&item.name)
        .bind(item.price)
        .bind(item.category)
        .bind(item.photo_url.as_deref())
        .bind(item.store_id)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "store does not exist"))?;

        Ok(created)
    }

    /// Overwrite an item's editable fields. The creator is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new store does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ItemId,
        changes: &NewItem,
    ) -> Result<GroceryItem, RepositoryError> {
        let updated = sqlx::query_as::<_, GroceryItem>(&format!(
            r"
            UPDATE grocery_items
            SET name = ?, price = ?, category = ?, photo_url = ?, store_id = ?, updated_at = ?
            WHERE id = ?
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(&changes.name)
        .bind(changes.price)
        .bind(changes.category)
        .bind(changes.photo_url.as_deref())
        .bind(changes.store_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "store does not exist"))?;

        updated.ok_or(RepositoryError::NotFound)
    }
}

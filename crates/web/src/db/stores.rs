//! Grocery store repository.

use chrono::Utc;
use sqlx::SqlitePool;

use grocery_core::{StoreId, UserId};

use super::RepositoryError;
use crate::models::store::{GroceryStore, NewStore};

const STORE_COLUMNS: &str = "id, title, address, created_by_id, created_at, updated_at";

/// Repository for grocery store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every store, alphabetically by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<GroceryStore>, RepositoryError> {
        let stores = sqlx::query_as::<_, GroceryStore>(&format!(
            "SELECT {STORE_COLUMNS} FROM grocery_stores ORDER BY title COLLATE NOCASE, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<GroceryStore>, RepositoryError> {
        let store = sqlx::query_as::<_, GroceryStore>(&format!(
            "SELECT {STORE_COLUMNS} FROM grocery_stores WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(store)
    }

    /// Create a store owned by `created_by`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the creator does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        store: &NewStore,
        created_by: UserId,
    ) -> Result<GroceryStore, RepositoryError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, GroceryStore>(&format!(
            r"
            INSERT INTO grocery_stores (title, address, created_by_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(&store.title)
        .bind(&store.address)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "creator does not exist"))?;

        Ok(created)
    }

    /// Overwrite a store's title and address. The creator is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: StoreId,
        changes: &NewStore,
    ) -> Result<GroceryStore, RepositoryError> {
        let updated = sqlx::query_as::<_, GroceryStore>(&format!(
            r"
            UPDATE grocery_stores
            SET title = ?, address = ?, updated_at = ?
            WHERE id = ?
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(&changes.title)
        .bind(&changes.address)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        updated.ok_or(RepositoryError::NotFound)
    }
}

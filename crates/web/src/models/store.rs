//! Grocery store domain types.

use chrono::{DateTime, Utc};

use grocery_core::{StoreId, UserId};

/// A grocery store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroceryStore {
    pub id: StoreId,
    pub title: String,
    pub address: String,
    /// User who created the store. Never changes after creation.
    pub created_by_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or updating a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStore {
    pub title: String,
    pub address: String,
}

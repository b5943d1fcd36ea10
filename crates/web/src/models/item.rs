//! Grocery item domain types.

use chrono::{DateTime, Utc};

use grocery_core::{ItemCategory, ItemId, Price, StoreId, UserId};

/// A grocery item sold at one store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroceryItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    pub photo_url: Option<String>,
    pub store_id: StoreId,
    /// User who created the item. Never changes after creation.
    pub created_by_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating or updating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    pub photo_url: Option<String>,
    pub store_id: StoreId,
}

/// An item joined with the title of its store, for listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemSummary {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub category: ItemCategory,
    pub store_id: StoreId,
    pub store_title: String,
}

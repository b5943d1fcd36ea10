//! Shopping list route handlers.
//!
//! Adding and removing are idempotent; the flash message tells the user
//! whether anything changed.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::ItemId;

use crate::db::{ItemRepository, ShoppingListRepository};
use crate::error::{AppError, Result};
use crate::flash::{self, FlashLevel};
use crate::middleware::RequireAuth;
use crate::models::GroceryItem;
use crate::state::AppState;

/// Add an item to the current user's shopping list.
#[instrument(skip_all, fields(user_id = %user.id, item_id = %id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<ItemId>,
) -> Result<Redirect> {
    let item = load_item(&state, id).await?;

    let added = ShoppingListRepository::new(state.pool())
        .add(user.id, item.id)
        .await?;

    if added {
        flash::push(
            &session,
            FlashLevel::Success,
            format!("Added {} to your shopping list.", item.name),
        )
        .await?;
    } else {
        flash::push(
            &session,
            FlashLevel::Info,
            format!("{} is already on your shopping list.", item.name),
        )
        .await?;
    }

    Ok(Redirect::to(&format!("/item/{id}")))
}

/// Remove an item from the current user's shopping list.
#[instrument(skip_all, fields(user_id = %user.id, item_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<ItemId>,
) -> Result<Redirect> {
    let item = load_item(&state, id).await?;

    let removed = ShoppingListRepository::new(state.pool())
        .remove(user.id, item.id)
        .await?;

    if removed {
        flash::push(
            &session,
            FlashLevel::Success,
            format!("Removed {} from your shopping list.", item.name),
        )
        .await?;
    } else {
        flash::push(
            &session,
            FlashLevel::Info,
            format!("{} was not on your shopping list.", item.name),
        )
        .await?;
    }

    Ok(Redirect::to(&format!("/item/{id}")))
}

async fn load_item(state: &AppState, id: ItemId) -> Result<GroceryItem> {
    ItemRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

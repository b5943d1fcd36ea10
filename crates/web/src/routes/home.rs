//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{ShoppingListRepository, StoreRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{GroceryStore, ItemSummary};
use crate::routes::PageContext;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub stores: Vec<GroceryStore>,
    /// Empty when nobody is logged in.
    pub shopping_list: Vec<ItemSummary>,
}

/// Display the home page.
///
/// Lists every store; a logged-in user also sees their shopping list.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<HomeTemplate> {
    let stores = StoreRepository::new(state.pool()).list_all().await?;

    let shopping_list = match &user {
        Some(user) => {
            ShoppingListRepository::new(state.pool())
                .list_for_user(user.id)
                .await?
        }
        None => Vec::new(),
    };

    Ok(HomeTemplate {
        page: PageContext::load(&session, user).await,
        stores,
        shopping_list,
    })
}

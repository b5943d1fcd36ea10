//! HTTP route handlers for the grocery site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Stores, plus the user's shopping list
//!
//! # Stores (requires auth)
//! GET  /new_store                       - Store create form
//! POST /new_store                       - Create store
//! GET  /store/{id}                      - Store detail, items and edit form
//! POST /store/{id}                      - Update store
//!
//! # Items (requires auth)
//! GET  /new_item                        - Item create form
//! POST /new_item                        - Create item
//! GET  /item/{id}                       - Item detail and edit form
//! POST /item/{id}                       - Update item
//!
//! # Shopping list (requires auth)
//! POST /add_to_shopping_list/{id}       - Add item, redirect to item
//! POST /remove_from_shopping_list/{id}  - Remove item, redirect to item
//!
//! # Auth
//! GET  /signup                          - Sign up page
//! POST /signup                          - Sign up action
//! GET  /login                           - Login page (honours `next`)
//! POST /login                           - Login action
//! GET  /logout                          - Logout action
//! ```
//!
//! `/health` and `/health/ready` are mounted alongside these in [`crate::app`].

pub mod auth;
pub mod home;
pub mod items;
pub mod shopping_list;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::flash::{self, FlashMessage};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Layout data shared by every rendered page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// The logged-in user, if any (drives the navigation links).
    pub user: Option<CurrentUser>,
    /// Status messages queued by the previous request.
    pub flashes: Vec<FlashMessage>,
}

impl PageContext {
    /// Build the layout context, consuming any queued flash messages.
    ///
    /// Call this only when a page is actually rendered so that messages
    /// survive redirects.
    pub async fn load(session: &Session, user: Option<CurrentUser>) -> Self {
        Self {
            user,
            flashes: flash::take(session).await,
        }
    }
}

/// A `<select>` option prepared for a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Create the store routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/new_store",
            get(stores::new_store_page).post(stores::create_store),
        )
        .route("/store/{id}", get(stores::show).post(stores::update))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/new_item", get(items::new_item_page).post(items::create_item))
        .route("/item/{id}", get(items::show).post(items::update))
}

/// Create the shopping list routes router.
pub fn shopping_list_routes() -> Router<AppState> {
    Router::new()
        .route("/add_to_shopping_list/{id}", post(shopping_list::add))
        .route(
            "/remove_from_shopping_list/{id}",
            post(shopping_list::remove),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create all page routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(store_routes())
        .merge(item_routes())
        .merge(shopping_list_routes())
        .merge(auth_routes())
}

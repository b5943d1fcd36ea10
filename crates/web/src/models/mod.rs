//! Domain models for the grocery list.
//!
//! These types represent rows loaded from the database, separate from the
//! form types in [`crate::forms`] and the view types in the route modules.

pub mod item;
pub mod session;
pub mod store;
pub mod user;

pub use item::{GroceryItem, ItemSummary, NewItem};
pub use session::{CurrentUser, keys as session_keys};
pub use store::{GroceryStore, NewStore};
pub use user::User;

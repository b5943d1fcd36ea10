//! Item route handlers.
//!
//! All routes require a logged-in user.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use grocery_core::{ItemCategory, ItemId};

use crate::db::{
    ItemRepository, RepositoryError, ShoppingListRepository, StoreRepository, UserRepository,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{self, FlashLevel};
use crate::forms::{FormErrors, ItemForm};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, GroceryItem, GroceryStore, NewItem};
use crate::routes::{PageContext, SelectOption};
use crate::state::AppState;

const UNKNOWN_STORE: &str = "Choose an existing store";

/// Item create page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_item.html")]
pub struct NewItemTemplate {
    pub page: PageContext,
    pub form: ItemForm,
    pub errors: FormErrors,
    pub stores: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
}

/// Item detail page template (detail, list status and edit form).
#[derive(Template, WebTemplate)]
#[template(path = "item_detail.html")]
pub struct ItemDetailTemplate {
    pub page: PageContext,
    pub item: GroceryItem,
    pub store_title: String,
    pub created_by: String,
    pub on_shopping_list: bool,
    pub form: ItemForm,
    pub errors: FormErrors,
    pub stores: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
}

/// Display the item create form.
#[instrument(skip_all)]
pub async fn new_item_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<NewItemTemplate> {
    render_new(&state, &session, user, ItemForm::default(), FormErrors::new()).await
}

/// Handle item create form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let new_item = match validate(&state, &form).await? {
        Ok(new_item) => new_item,
        Err(errors) => return rejected_new(&state, &session, user, form, errors).await,
    };

    let item = match ItemRepository::new(state.pool())
        .create(&new_item, user.id)
        .await
    {
        Ok(item) => item,
        // The store vanished between the check and the insert
        Err(RepositoryError::Conflict(_)) => {
            let mut errors = FormErrors::new();
            errors.add("store_id", UNKNOWN_STORE);
            return rejected_new(&state, &session, user, form, errors).await;
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(item_id = %item.id, store_id = %item.store_id, "item created");

    flash::push(&session, FlashLevel::Success, "New item added.").await?;
    Ok(Redirect::to(&format!("/item/{}", item.id)).into_response())
}

/// Display an item with its shopping list status and the edit form.
#[instrument(skip_all, fields(item_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<ItemId>,
) -> Result<ItemDetailTemplate> {
    let item = load_item(&state, id).await?;
    let form = ItemForm::from_item(&item);

    render_detail(&state, &session, user, item, form, FormErrors::new()).await
}

/// Handle item edit form submission.
///
/// The creator is kept; every other field is overwritten.
#[instrument(skip_all, fields(item_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<ItemId>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let item = load_item(&state, id).await?;

    let changes = match validate(&state, &form).await? {
        Ok(changes) => changes,
        Err(errors) => return rejected_detail(&state, &session, user, item, form, errors).await,
    };

    match ItemRepository::new(state.pool()).update(id, &changes).await {
        Ok(_) => {}
        Err(RepositoryError::Conflict(_)) => {
            let mut errors = FormErrors::new();
            errors.add("store_id", UNKNOWN_STORE);
            return rejected_detail(&state, &session, user, item, form, errors).await;
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(item_id = %id, "item updated");

    flash::push(&session, FlashLevel::Success, "Item updated.").await?;
    Ok(Redirect::to(&format!("/item/{id}")).into_response())
}

/// Run the form rules, then confirm the chosen store exists.
async fn validate(
    state: &AppState,
    form: &ItemForm,
) -> Result<std::result::Result<NewItem, FormErrors>> {
    let new_item = match form.parse() {
        Ok(new_item) => new_item,
        Err(errors) => return Ok(Err(errors)),
    };

    if StoreRepository::new(state.pool())
        .get_by_id(new_item.store_id)
        .await?
        .is_none()
    {
        let mut errors = FormErrors::new();
        errors.add("store_id", UNKNOWN_STORE);
        return Ok(Err(errors));
    }

    Ok(Ok(new_item))
}

async fn load_item(state: &AppState, id: ItemId) -> Result<GroceryItem> {
    ItemRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

async fn rejected_new(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    form: ItemForm,
    errors: FormErrors,
) -> Result<Response> {
    let page = render_new(state, session, user, form, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

async fn rejected_detail(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    item: GroceryItem,
    form: ItemForm,
    errors: FormErrors,
) -> Result<Response> {
    let page = render_detail(state, session, user, item, form, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

async fn render_new(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    form: ItemForm,
    errors: FormErrors,
) -> Result<NewItemTemplate> {
    let all_stores = StoreRepository::new(state.pool()).list_all().await?;

    Ok(NewItemTemplate {
        page: PageContext::load(session, Some(user)).await,
        stores: store_options(&all_stores, &form.store_id),
        categories: category_options(&form.category),
        form,
        errors,
    })
}

async fn render_detail(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    item: GroceryItem,
    form: ItemForm,
    errors: FormErrors,
) -> Result<ItemDetailTemplate> {
    let all_stores = StoreRepository::new(state.pool()).list_all().await?;
    let store_title = all_stores
        .iter()
        .find(|s| s.id == item.store_id)
        .map(|s| s.title.clone())
        .ok_or_else(|| {
            AppError::Database(RepositoryError::DataCorruption(format!(
                "item {} references missing store {}",
                item.id, item.store_id
            )))
        })?;

    let created_by = UserRepository::new(state.pool())
        .get_by_id(item.created_by_id)
        .await?
        .map_or_else(
            || format!("user #{}", item.created_by_id),
            |u| u.username.into_inner(),
        );

    let on_shopping_list = ShoppingListRepository::new(state.pool())
        .contains(user.id, item.id)
        .await?;

    Ok(ItemDetailTemplate {
        page: PageContext::load(session, Some(user)).await,
        stores: store_options(&all_stores, &form.store_id),
        categories: category_options(&form.category),
        item,
        store_title,
        created_by,
        on_shopping_list,
        form,
        errors,
    })
}

fn store_options(stores: &[GroceryStore], selected: &str) -> Vec<SelectOption> {
    stores
        .iter()
        .map(|store| {
            let value = store.id.to_string();
            SelectOption {
                selected: value == selected.trim(),
                value,
                label: store.title.clone(),
            }
        })
        .collect()
}

fn category_options(selected: &str) -> Vec<SelectOption> {
    let selected = ItemCategory::parse(selected.trim()).ok();
    ItemCategory::ALL
        .iter()
        .map(|category| SelectOption {
            value: category.as_str().to_string(),
            label: category.label().to_string(),
            selected: selected == Some(*category),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use grocery_core::{StoreId, UserId};

    use super::*;

    fn store(id: i64, title: &str) -> GroceryStore {
        GroceryStore {
            id: StoreId::new(id),
            title: title.to_string(),
            address: "1 Main St".to_string(),
            created_by_id: UserId::new(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_store_options_marks_selection() {
        let stores = [store(1, "Joe's"), store(2, "Corner Shop")];
        let options = store_options(&stores, "2");
        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].label, "Corner Shop");
    }

    #[test]
    fn test_category_options_cover_all_categories() {
        let options = category_options("deli");
        assert_eq!(options.len(), ItemCategory::ALL.len());
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
        assert!(options.iter().any(|o| o.value == "deli" && o.selected));
    }

    #[test]
    fn test_category_options_without_selection() {
        assert!(category_options("").iter().all(|o| !o.selected));
    }
}

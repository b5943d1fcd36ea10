//! Store route handlers.
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

use grocery_core::StoreId;

use crate::db::{ItemRepository, StoreRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::flash::{self, FlashLevel};
use crate::forms::{FormErrors, StoreForm};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, GroceryStore, ItemSummary};
use crate::routes::PageContext;
use crate::state::AppState;

/// Store create page template.
#[derive(Template, WebTemplate)]
#[template(path = "new_store.html")]
pub struct NewStoreTemplate {
    pub page: PageContext,
    pub form: StoreForm,
    pub errors: FormErrors,
}

/// Store detail page template (detail, item list and edit form).
#[derive(Template, WebTemplate)]
#[template(path = "store_detail.html")]
pub struct StoreDetailTemplate {
    pub page: PageContext,
    pub store: GroceryStore,
    pub created_by: String,
    pub items: Vec<ItemSummary>,
    pub form: StoreForm,
    pub errors: FormErrors,
}

/// Display the store create form.
#[instrument(skip_all)]
pub async fn new_store_page(
    RequireAuth(user): RequireAuth,
    session: Session,
) -> NewStoreTemplate {
    NewStoreTemplate {
        page: PageContext::load(&session, Some(user)).await,
        form: StoreForm::default(),
        errors: FormErrors::new(),
    }
}

/// Handle store create form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let new_store = match form.parse() {
        Ok(new_store) => new_store,
        Err(errors) => {
            let page = NewStoreTemplate {
                page: PageContext::load(&session, Some(user)).await,
                form,
                errors,
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let store = StoreRepository::new(state.pool())
        .create(&new_store, user.id)
        .await?;

    tracing::info!(store_id = %store.id, title = %store.title, "store created");

    flash::push(&session, FlashLevel::Success, "New store added.").await?;
    Ok(Redirect::to(&format!("/store/{}", store.id)).into_response())
}

/// Display a store with its items and the edit form.
#[instrument(skip_all, fields(store_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<StoreId>,
) -> Result<StoreDetailTemplate> {
    let store = load_store(&state, id).await?;
    let form = StoreForm::from_store(&store);

    render_detail(&state, &session, user, store, form, FormErrors::new()).await
}

/// Handle store edit form submission.
///
/// Only the title and address change; the creator is kept.
#[instrument(skip_all, fields(store_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(id): Path<StoreId>,
    Form(form): Form<StoreForm>,
) -> Result<Response> {
    let store = load_store(&state, id).await?;

    let changes = match form.parse() {
        Ok(changes) => changes,
        Err(errors) => {
            let page = render_detail(&state, &session, user, store, form, errors).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    StoreRepository::new(state.pool())
        .update(id, &changes)
        .await?;

    tracing::info!(store_id = %id, "store updated");

    flash::push(&session, FlashLevel::Success, "Store updated.").await?;
    Ok(Redirect::to(&format!("/store/{id}")).into_response())
}

async fn load_store(state: &AppState, id: StoreId) -> Result<GroceryStore> {
    StoreRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("store {id}")))
}

async fn render_detail(
    state: &AppState,
    session: &Session,
    user: CurrentUser,
    store: GroceryStore,
    form: StoreForm,
    errors: FormErrors,
) -> Result<StoreDetailTemplate> {
    let items = ItemRepository::new(state.pool())
        .list_for_store(store.id)
        .await?;
    let created_by = creator_name(state, &store).await?;

    Ok(StoreDetailTemplate {
        page: PageContext::load(session, Some(user)).await,
        store,
        created_by,
        items,
        form,
        errors,
    })
}

async fn creator_name(state: &AppState, store: &GroceryStore) -> Result<String> {
    let creator = UserRepository::new(state.pool())
        .get_by_id(store.created_by_id)
        .await?;

    Ok(creator.map_or_else(
        || format!("user #{}", store.created_by_id),
        |u| u.username.into_inner(),
    ))
}

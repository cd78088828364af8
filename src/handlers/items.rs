// region:    --- Imports
use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path, Query};
use crate::model::{Item, NewItem};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/item", get(handle_get_items).post(handle_create_item))
        .route("/item/search", get(handle_search_items))
        .route(
            "/item/:id",
            get(handle_get_item)
                .put(handle_update_item)
                .delete(handle_delete_item),
        )
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

/// Load the item and make sure the caller is its seller
async fn require_own_item(state: &AppState, auth: &AuthUser, id: i64) -> AppResult<Item> {
    let item = state
        .store
        .retrieve_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    if item.seller_id != auth.id() {
        return Err(AppError::Forbidden("Not Authorized".into()));
    }
    Ok(item)
}

// region:    --- Command Handlers

/// List an item for sale under the authenticated user
pub async fn handle_create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new_item): Json<NewItem>,
) -> AppResult<Json<Item>> {
    info!(
        "{:<12} --> create item '{}' for {}",
        "HandlerItem",
        new_item.name,
        auth.username()
    );
    new_item.validate()?;
    Ok(Json(state.store.create_item(auth.id(), new_item).await?))
}

pub async fn handle_update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(new_item): Json<NewItem>,
) -> AppResult<Json<Item>> {
    info!("{:<12} --> update item id: {}", "HandlerItem", id);
    new_item.validate()?;
    require_own_item(&state, &auth, id).await?;

    let item = state
        .store
        .update_item(id, new_item)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    Ok(Json(item))
}

pub async fn handle_delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    info!("{:<12} --> delete item id: {}", "HandlerItem", id);
    require_own_item(&state, &auth, id).await?;

    if !state.store.delete_item(id).await? {
        return Err(AppError::NotFound("Item not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

pub async fn handle_get_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    info!("{:<12} --> all items", "HandlerItem");
    Ok(Json(state.store.retrieve_all_items().await?))
}

pub async fn handle_get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    info!("{:<12} --> get item id: {}", "HandlerItem", id);
    let item = state
        .store
        .retrieve_item(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    Ok(Json(item))
}

pub async fn handle_search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Item>>> {
    info!("{:<12} --> search items: {}", "HandlerItem", params.keyword);
    let keyword = params.keyword.trim();
    if keyword.is_empty() {
        return Err(AppError::BadRequest("Search keyword must not be empty".into()));
    }
    Ok(Json(state.store.search_items(keyword).await?))
}

// endregion: --- Query Handlers

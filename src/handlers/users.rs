// region:    --- Imports
use crate::auth::{hash_password, AuthUser};
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::model::{Feedback, Item, NewUser, User, UserUpdate};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

// endregion: --- Imports

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(handle_create_user))
        .route(
            "/user/:id",
            get(handle_get_user)
                .put(handle_update_user)
                .delete(handle_delete_user),
        )
        .route("/user/:id/items", get(handle_get_user_items))
        .route("/user/:id/feedback", get(handle_get_user_feedback))
}

async fn require_user(state: &AppState, id: i64) -> AppResult<User> {
    state
        .store
        .retrieve_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

fn require_self(auth: &AuthUser, id: i64) -> AppResult<()> {
    if auth.id() != id {
        return Err(AppError::Forbidden("Not Authorized".into()));
    }
    Ok(())
}

// region:    --- Command Handlers

/// Sign up
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> AppResult<Json<User>> {
    info!("{:<12} --> create user: {}", "HandlerUser", new_user.username);
    new_user.validate()?;

    if state
        .store
        .retrieve_user_by_username(&new_user.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already exists".into()));
    }

    let password = hash_password(&new_user.password)?;
    let user = state
        .store
        .create_user(NewUser {
            password,
            ..new_user
        })
        .await?;
    Ok(Json(user))
}

pub async fn handle_update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(mut update): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    info!("{:<12} --> update user id: {}", "HandlerUser", id);
    require_self(&auth, id)?;
    update.validate()?;

    update.password = match update.password.as_deref() {
        Some(plain) if !plain.is_empty() => Some(hash_password(plain)?),
        _ => None,
    };

    let user = state
        .store
        .update_user(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

pub async fn handle_delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    info!("{:<12} --> delete user id: {}", "HandlerUser", id);
    require_self(&auth, id)?;

    if !state.store.delete_user(id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    info!("{:<12} --> get user id: {}", "HandlerUser", id);
    Ok(Json(require_user(&state, id).await?))
}

/// Items the user is selling
pub async fn handle_get_user_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Item>>> {
    info!("{:<12} --> items of user id: {}", "HandlerUser", id);
    require_user(&state, id).await?;
    Ok(Json(state.store.retrieve_items_by_seller(id).await?))
}

pub async fn handle_get_user_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Feedback>>> {
    info!("{:<12} --> feedback of user id: {}", "HandlerUser", id);
    require_user(&state, id).await?;
    Ok(Json(state.store.retrieve_feedback_for_user(id).await?))
}

// endregion: --- Query Handlers

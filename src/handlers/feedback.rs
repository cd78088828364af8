// region:    --- Imports
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::model::{Feedback, NewFeedback};
use crate::notification;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

// endregion: --- Imports

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feedback", post(handle_create_feedback))
        .route("/feedback/user/:user_id", get(handle_get_feedback_for_user))
        .route(
            "/feedback/:id",
            get(handle_get_feedback).delete(handle_delete_feedback),
        )
}

// region:    --- Command Handlers

pub async fn handle_create_feedback(
    State(state): State<AppState>,
    Json(new_feedback): Json<NewFeedback>,
) -> AppResult<Json<Feedback>> {
    info!(
        "{:<12} --> create feedback for user: {}",
        "HandlerFeed", new_feedback.user_id
    );
    new_feedback.validate()?;

    let user = state
        .store
        .retrieve_user(new_feedback.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let feedback = state.store.create_feedback(new_feedback).await?;

    notification::dispatch(
        state.notifier.clone(),
        user.email,
        "You received new feedback".to_string(),
        format!(
            "Hi {}, someone rated you {}/5: \"{}\"",
            user.username, feedback.rating, feedback.feedback_description
        ),
    );

    Ok(Json(feedback))
}

pub async fn handle_delete_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    info!("{:<12} --> delete feedback id: {}", "HandlerFeed", id);
    if !state.store.delete_feedback(id).await? {
        return Err(AppError::NotFound("Feedback not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// Feedback left for a user; an unknown user simply has none
pub async fn handle_get_feedback_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Feedback>>> {
    info!("{:<12} --> feedback of user: {}", "HandlerFeed", user_id);
    Ok(Json(state.store.retrieve_feedback_for_user(user_id).await?))
}

pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Feedback>> {
    info!("{:<12} --> get feedback id: {}", "HandlerFeed", id);
    let feedback = state
        .store
        .retrieve_feedback(id)
        .await?
        .ok_or_else(|| AppError::NotFound("No feedback matches your request".into()))?;
    Ok(Json(feedback))
}

// endregion: --- Query Handlers

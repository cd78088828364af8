// region:    --- Imports
use crate::auth::AuthUser;
use crate::bidding::BidOutcome;
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Path};
use crate::model::{Bid, Item, NewBid};
use crate::notification;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tracing::{info, warn};

// endregion: --- Imports

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bids", post(handle_place_bid))
        .route("/bids/history/:item_id", get(handle_get_bid_history))
        .route("/bids/item/:item_id", get(handle_get_highest_bid))
        .route("/bids/:id", get(handle_get_bid).delete(handle_delete_bid))
}

// region:    --- Command Handlers

/// Place a bid. The first bid on an item always wins; later ones must beat the highest.
pub async fn handle_place_bid(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(new_bid): Json<NewBid>,
) -> AppResult<Json<Bid>> {
    info!("{:<12} --> place bid: {:?}", "HandlerBid", new_bid);

    if new_bid.bidder_id != auth.id() {
        return Err(AppError::Forbidden("Not Authorized".into()));
    }
    if new_bid.bid_amount <= 0 {
        return Err(AppError::BadRequest(
            "Bid amount must be greater than zero".into(),
        ));
    }

    let item = state
        .store
        .retrieve_item(new_bid.item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;

    match state.store.place_bid(new_bid).await? {
        BidOutcome::Accepted {
            bid,
            previous_highest,
        } => {
            info!(
                "{:<12} --> bid {} accepted at {}",
                "HandlerBid", bid.id, bid.bid_amount
            );
            if let Some(previous) = previous_highest {
                notify_outbid(&state, &item, &previous, &bid).await;
            }
            Ok(Json(bid))
        }
        BidOutcome::Rejected(rejection) => Err(AppError::BadRequest(rejection.to_string())),
        BidOutcome::ItemNotFound => Err(AppError::NotFound("Item not found".into())),
    }
}

/// Tell the previous leader they lost the top spot
async fn notify_outbid(state: &AppState, item: &Item, previous: &Bid, winning: &Bid) {
    if previous.bidder_id == winning.bidder_id {
        return;
    }
    match state.store.retrieve_user(previous.bidder_id).await {
        Ok(Some(user)) => notification::dispatch(
            state.notifier.clone(),
            user.email,
            format!("You have been outbid on {}", item.name),
            format!(
                "Hi {}, your bid of ${} on \"{}\" is no longer the highest. The current highest bid is ${}.",
                user.username, previous.bid_amount, item.name, winning.bid_amount
            ),
        ),
        Ok(None) => {}
        Err(e) => warn!("{:<12} --> could not load outbid user: {}", "HandlerBid", e),
    }
}

pub async fn handle_delete_bid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    info!("{:<12} --> delete bid id: {}", "HandlerBid", id);
    let bid = state
        .store
        .retrieve_bid(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Bid not found".into()))?;
    if bid.bidder_id != auth.id() {
        return Err(AppError::Forbidden("Not Authorized".into()));
    }

    if !state.store.delete_bid(id).await? {
        return Err(AppError::NotFound("Bid not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

pub async fn handle_get_bid_history(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<Vec<Bid>>> {
    info!("{:<12} --> bid history item: {}", "HandlerBid", item_id);
    Ok(Json(state.store.find_bids_by_item(item_id).await?))
}

pub async fn handle_get_bid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Bid>> {
    info!("{:<12} --> get bid id: {}", "HandlerBid", id);
    let bid = state
        .store
        .retrieve_bid(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Bid not found".into()))?;
    Ok(Json(bid))
}

pub async fn handle_get_highest_bid(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<Bid>> {
    info!("{:<12} --> highest bid item: {}", "HandlerBid", item_id);
    let highest = state
        .store
        .retrieve_highest_bid(item_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("There are no bids for this item yet.".into()))?;
    Ok(Json(highest))
}

// endregion: --- Query Handlers

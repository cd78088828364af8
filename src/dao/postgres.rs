//! PostgreSQL implementation of the DAO traits on top of [`DatabaseManager`].

// region:    --- Imports
use super::{queries, BidDao, DaoError, DaoResult, FeedbackDao, ItemDao, UserDao};
use crate::bidding::{self, BidOutcome};
use crate::database::DatabaseManager;
use crate::model::{Bid, Feedback, Item, NewBid, NewFeedback, NewItem, NewUser, User, UserUpdate};
use async_trait::async_trait;
use tracing::{debug, info};

// endregion: --- Imports

/// Map a unique-constraint violation to [`DaoError::Duplicate`]
fn unique_violation(err: sqlx::Error, what: &'static str) -> DaoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DaoError::Duplicate(what),
        _ => DaoError::Database(err),
    }
}

// region:    --- UserDao

#[async_trait]
impl UserDao for DatabaseManager {
    async fn create_user(&self, user: NewUser) -> DaoResult<User> {
        debug!("{:<12} --> insert user {}", "Query", user.username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.address)
            .bind(&user.email)
            .fetch_one(self.pool())
            .await
            .map_err(|e| unique_violation(e, "Username"))
    }

    async fn retrieve_user(&self, id: i64) -> DaoResult<Option<User>> {
        debug!("{:<12} --> user id: {}", "Query", id);
        Ok(sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn retrieve_user_by_username(&self, username: &str) -> DaoResult<Option<User>> {
        debug!("{:<12} --> user name: {}", "Query", username);
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> DaoResult<Option<User>> {
        debug!("{:<12} --> update user id: {}", "Query", id);
        Ok(sqlx::query_as::<_, User>(queries::UPDATE_USER)
            .bind(id)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.address)
            .bind(&update.email)
            .bind(update.password)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn delete_user(&self, id: i64) -> DaoResult<bool> {
        debug!("{:<12} --> delete user id: {}", "Query", id);
        let result = sqlx::query(queries::DELETE_USER)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// endregion: --- UserDao

// region:    --- ItemDao

#[async_trait]
impl ItemDao for DatabaseManager {
    async fn create_item(&self, seller_id: i64, item: NewItem) -> DaoResult<Item> {
        debug!("{:<12} --> insert item for seller {}", "Query", seller_id);
        Ok(sqlx::query_as::<_, Item>(queries::INSERT_ITEM)
            .bind(&item.name)
            .bind(&item.description)
            .bind(seller_id)
            .fetch_one(self.pool())
            .await?)
    }

    async fn retrieve_item(&self, id: i64) -> DaoResult<Option<Item>> {
        debug!("{:<12} --> item id: {}", "Query", id);
        Ok(sqlx::query_as::<_, Item>(queries::GET_ITEM)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn retrieve_all_items(&self) -> DaoResult<Vec<Item>> {
        debug!("{:<12} --> all items", "Query");
        Ok(sqlx::query_as::<_, Item>(queries::GET_ALL_ITEMS)
            .fetch_all(self.pool())
            .await?)
    }

    async fn retrieve_items_by_seller(&self, seller_id: i64) -> DaoResult<Vec<Item>> {
        debug!("{:<12} --> items of seller {}", "Query", seller_id);
        Ok(sqlx::query_as::<_, Item>(queries::GET_ITEMS_BY_SELLER)
            .bind(seller_id)
            .fetch_all(self.pool())
            .await?)
    }

    async fn search_items(&self, keyword: &str) -> DaoResult<Vec<Item>> {
        debug!("{:<12} --> search items: {}", "Query", keyword);
        let pattern = format!("%{}%", escape_like(keyword));
        Ok(sqlx::query_as::<_, Item>(queries::SEARCH_ITEMS)
            .bind(pattern)
            .fetch_all(self.pool())
            .await?)
    }

    async fn update_item(&self, id: i64, item: NewItem) -> DaoResult<Option<Item>> {
        debug!("{:<12} --> update item id: {}", "Query", id);
        Ok(sqlx::query_as::<_, Item>(queries::UPDATE_ITEM)
            .bind(id)
            .bind(&item.name)
            .bind(&item.description)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn delete_item(&self, id: i64) -> DaoResult<bool> {
        debug!("{:<12} --> delete item id: {}", "Query", id);
        let result = sqlx::query(queries::DELETE_ITEM)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape LIKE wildcards so a keyword matches literally
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// endregion: --- ItemDao

// region:    --- BidDao

#[async_trait]
impl BidDao for DatabaseManager {
    async fn place_bid(&self, bid: NewBid) -> DaoResult<BidOutcome> {
        info!(
            "{:<12} --> place bid item: {}, amount: {}",
            "Query", bid.item_id, bid.bid_amount
        );
        let outcome = self
            .transaction::<_, BidOutcome, sqlx::Error>(|tx| {
                Box::pin(async move {
                    let locked = sqlx::query(queries::LOCK_ITEM)
                        .bind(bid.item_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if locked.is_none() {
                        return Ok(BidOutcome::ItemNotFound);
                    }

                    let highest = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
                        .bind(bid.item_id)
                        .fetch_optional(&mut **tx)
                        .await?;

                    if let Err(rejection) = bidding::evaluate_bid(highest.as_ref(), bid.bid_amount)
                    {
                        return Ok(BidOutcome::Rejected(rejection));
                    }

                    let created = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(bid.item_id)
                        .bind(bid.bidder_id)
                        .bind(bid.bid_amount)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok(BidOutcome::Accepted {
                        bid: created,
                        previous_highest: highest,
                    })
                })
            })
            .await?;
        Ok(outcome)
    }

    async fn retrieve_bid(&self, id: i64) -> DaoResult<Option<Bid>> {
        debug!("{:<12} --> bid id: {}", "Query", id);
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BID)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn retrieve_highest_bid(&self, item_id: i64) -> DaoResult<Option<Bid>> {
        debug!("{:<12} --> highest bid item: {}", "Query", item_id);
        Ok(sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
            .bind(item_id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn find_bids_by_item(&self, item_id: i64) -> DaoResult<Vec<Bid>> {
        debug!("{:<12} --> bid history item: {}", "Query", item_id);
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(item_id)
            .fetch_all(self.pool())
            .await?)
    }

    async fn delete_bid(&self, id: i64) -> DaoResult<bool> {
        debug!("{:<12} --> delete bid id: {}", "Query", id);
        let result = sqlx::query(queries::DELETE_BID)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// endregion: --- BidDao

// region:    --- FeedbackDao

#[async_trait]
impl FeedbackDao for DatabaseManager {
    async fn create_feedback(&self, feedback: NewFeedback) -> DaoResult<Feedback> {
        debug!("{:<12} --> insert feedback for user {}", "Query", feedback.user_id);
        Ok(sqlx::query_as::<_, Feedback>(queries::INSERT_FEEDBACK)
            .bind(feedback.user_id)
            .bind(feedback.rating)
            .bind(&feedback.feedback_description)
            .fetch_one(self.pool())
            .await?)
    }

    async fn retrieve_feedback(&self, id: i64) -> DaoResult<Option<Feedback>> {
        debug!("{:<12} --> feedback id: {}", "Query", id);
        Ok(sqlx::query_as::<_, Feedback>(queries::GET_FEEDBACK)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn retrieve_feedback_for_user(&self, user_id: i64) -> DaoResult<Vec<Feedback>> {
        debug!("{:<12} --> feedback of user {}", "Query", user_id);
        Ok(sqlx::query_as::<_, Feedback>(queries::GET_FEEDBACK_FOR_USER)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?)
    }

    async fn delete_feedback(&self, id: i64) -> DaoResult<bool> {
        debug!("{:<12} --> delete feedback id: {}", "Query", id);
        let result = sqlx::query(queries::DELETE_FEEDBACK)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// endregion: --- FeedbackDao

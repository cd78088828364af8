//! Data access objects.
//!
//! Each trait groups the statements for one table. Every method maps to a
//! single statement in [`queries`], except [`BidDao::place_bid`], which is
//! one unit of work that reads the highest bid and inserts the new one.

// region:    --- Imports
use crate::bidding::BidOutcome;
use crate::model::{Bid, Feedback, Item, NewBid, NewFeedback, NewItem, NewUser, User, UserUpdate};
use async_trait::async_trait;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;
pub mod queries;

pub use memory::MemoryStore;

// endregion: --- Modules

// region:    --- Error

#[derive(Debug, Error)]
pub enum DaoError {
    /// A unique column already holds this value
    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type DaoResult<T> = Result<T, DaoError>;

// endregion: --- Error

// region:    --- DAO Traits

#[async_trait]
pub trait UserDao: Send + Sync {
    /// `user.password` must already be hashed
    async fn create_user(&self, user: NewUser) -> DaoResult<User>;
    async fn retrieve_user(&self, id: i64) -> DaoResult<Option<User>>;
    async fn retrieve_user_by_username(&self, username: &str) -> DaoResult<Option<User>>;
    /// `update.password`, when present, must already be hashed
    async fn update_user(&self, id: i64, update: UserUpdate) -> DaoResult<Option<User>>;
    async fn delete_user(&self, id: i64) -> DaoResult<bool>;
}

#[async_trait]
pub trait ItemDao: Send + Sync {
    async fn create_item(&self, seller_id: i64, item: NewItem) -> DaoResult<Item>;
    async fn retrieve_item(&self, id: i64) -> DaoResult<Option<Item>>;
    async fn retrieve_all_items(&self) -> DaoResult<Vec<Item>>;
    async fn retrieve_items_by_seller(&self, seller_id: i64) -> DaoResult<Vec<Item>>;
    async fn search_items(&self, keyword: &str) -> DaoResult<Vec<Item>>;
    async fn update_item(&self, id: i64, item: NewItem) -> DaoResult<Option<Item>>;
    async fn delete_item(&self, id: i64) -> DaoResult<bool>;
}

#[async_trait]
pub trait BidDao: Send + Sync {
    /// Compare against the current highest bid and insert if it wins
    async fn place_bid(&self, bid: NewBid) -> DaoResult<BidOutcome>;
    async fn retrieve_bid(&self, id: i64) -> DaoResult<Option<Bid>>;
    async fn retrieve_highest_bid(&self, item_id: i64) -> DaoResult<Option<Bid>>;
    async fn find_bids_by_item(&self, item_id: i64) -> DaoResult<Vec<Bid>>;
    async fn delete_bid(&self, id: i64) -> DaoResult<bool>;
}

#[async_trait]
pub trait FeedbackDao: Send + Sync {
    async fn create_feedback(&self, feedback: NewFeedback) -> DaoResult<Feedback>;
    async fn retrieve_feedback(&self, id: i64) -> DaoResult<Option<Feedback>>;
    async fn retrieve_feedback_for_user(&self, user_id: i64) -> DaoResult<Vec<Feedback>>;
    async fn delete_feedback(&self, id: i64) -> DaoResult<bool>;
}

/// Everything the resources need from persistence
pub trait Store: UserDao + ItemDao + BidDao + FeedbackDao {}

impl<T> Store for T where T: UserDao + ItemDao + BidDao + FeedbackDao {}

// endregion: --- DAO Traits

//! In-process store with the same semantics as the PostgreSQL tables.
//!
//! Used when no database is configured and by the test suite. Ids come from
//! per-table sequences, so iteration order in the maps is insertion order.

// region:    --- Imports
use super::{BidDao, DaoError, DaoResult, FeedbackDao, ItemDao, UserDao};
use crate::bidding::{self, BidOutcome};
use crate::model::{Bid, Feedback, Item, NewBid, NewFeedback, NewItem, NewUser, User, UserUpdate};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

// endregion: --- Imports

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    items: BTreeMap<i64, Item>,
    bids: BTreeMap<i64, Bid>,
    feedback: BTreeMap<i64, Feedback>,
    user_seq: i64,
    item_seq: i64,
    bid_seq: i64,
    feedback_seq: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// region:    --- UserDao

#[async_trait]
impl UserDao for MemoryStore {
    async fn create_user(&self, user: NewUser) -> DaoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(DaoError::Duplicate("Username"));
        }
        let id = next(&mut tables.user_seq);
        let created = User {
            id,
            username: user.username,
            password: user.password,
            first_name: user.first_name,
            last_name: user.last_name,
            address: user.address,
            email: user.email,
            created_at: Utc::now(),
        };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn retrieve_user(&self, id: i64) -> DaoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn retrieve_user_by_username(&self, username: &str) -> DaoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> DaoResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.address = update.address;
        user.email = update.email;
        if let Some(password) = update.password {
            user.password = password;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> DaoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        // ON DELETE CASCADE
        let sold: Vec<i64> = tables
            .items
            .values()
            .filter(|item| item.seller_id == id)
            .map(|item| item.id)
            .collect();
        tables.items.retain(|_, item| item.seller_id != id);
        tables
            .bids
            .retain(|_, bid| bid.bidder_id != id && !sold.contains(&bid.item_id));
        tables.feedback.retain(|_, feedback| feedback.user_id != id);
        Ok(true)
    }
}

// endregion: --- UserDao

// region:    --- ItemDao

#[async_trait]
impl ItemDao for MemoryStore {
    async fn create_item(&self, seller_id: i64, item: NewItem) -> DaoResult<Item> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.item_seq);
        let created = Item {
            id,
            name: item.name,
            description: item.description,
            seller_id,
            created_at: Utc::now(),
        };
        tables.items.insert(id, created.clone());
        Ok(created)
    }

    async fn retrieve_item(&self, id: i64) -> DaoResult<Option<Item>> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn retrieve_all_items(&self) -> DaoResult<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.items.values().rev().cloned().collect())
    }

    async fn retrieve_items_by_seller(&self, seller_id: i64) -> DaoResult<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .rev()
            .filter(|item| item.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn search_items(&self, keyword: &str) -> DaoResult<Vec<Item>> {
        let keyword = keyword.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .rev()
            .filter(|item| {
                item.name.to_lowercase().contains(&keyword)
                    || item.description.to_lowercase().contains(&keyword)
            })
            .cloned()
            .collect())
    }

    async fn update_item(&self, id: i64, item: NewItem) -> DaoResult<Option<Item>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.items.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = item.name;
        existing.description = item.description;
        Ok(Some(existing.clone()))
    }

    async fn delete_item(&self, id: i64) -> DaoResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.items.remove(&id).is_none() {
            return Ok(false);
        }
        tables.bids.retain(|_, bid| bid.item_id != id);
        Ok(true)
    }
}

// endregion: --- ItemDao

// region:    --- BidDao

fn highest_bid<'a>(bids: impl Iterator<Item = &'a Bid>, item_id: i64) -> Option<&'a Bid> {
    bids.filter(|bid| bid.item_id == item_id).max_by(|a, b| {
        a.bid_amount
            .cmp(&b.bid_amount)
            .then_with(|| b.id.cmp(&a.id))
    })
}

#[async_trait]
impl BidDao for MemoryStore {
    async fn place_bid(&self, bid: NewBid) -> DaoResult<BidOutcome> {
        // the write lock plays the role of the row lock
        let mut tables = self.tables.write().await;
        if !tables.items.contains_key(&bid.item_id) {
            return Ok(BidOutcome::ItemNotFound);
        }
        let highest = highest_bid(tables.bids.values(), bid.item_id).cloned();

        if let Err(rejection) = bidding::evaluate_bid(highest.as_ref(), bid.bid_amount) {
            return Ok(BidOutcome::Rejected(rejection));
        }

        let id = next(&mut tables.bid_seq);
        let created = Bid {
            id,
            item_id: bid.item_id,
            bidder_id: bid.bidder_id,
            bid_amount: bid.bid_amount,
            bid_time: Utc::now(),
        };
        tables.bids.insert(id, created.clone());
        Ok(BidOutcome::Accepted {
            bid: created,
            previous_highest: highest,
        })
    }

    async fn retrieve_bid(&self, id: i64) -> DaoResult<Option<Bid>> {
        Ok(self.tables.read().await.bids.get(&id).cloned())
    }

    async fn retrieve_highest_bid(&self, item_id: i64) -> DaoResult<Option<Bid>> {
        let tables = self.tables.read().await;
        Ok(highest_bid(tables.bids.values(), item_id).cloned())
    }

    async fn find_bids_by_item(&self, item_id: i64) -> DaoResult<Vec<Bid>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bids
            .values()
            .rev()
            .filter(|bid| bid.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn delete_bid(&self, id: i64) -> DaoResult<bool> {
        Ok(self.tables.write().await.bids.remove(&id).is_some())
    }
}

// endregion: --- BidDao

// region:    --- FeedbackDao

#[async_trait]
impl FeedbackDao for MemoryStore {
    async fn create_feedback(&self, feedback: NewFeedback) -> DaoResult<Feedback> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.feedback_seq);
        let created = Feedback {
            id,
            user_id: feedback.user_id,
            rating: feedback.rating,
            feedback_description: feedback.feedback_description,
            created_at: Utc::now(),
        };
        tables.feedback.insert(id, created.clone());
        Ok(created)
    }

    async fn retrieve_feedback(&self, id: i64) -> DaoResult<Option<Feedback>> {
        Ok(self.tables.read().await.feedback.get(&id).cloned())
    }

    async fn retrieve_feedback_for_user(&self, user_id: i64) -> DaoResult<Vec<Feedback>> {
        let tables = self.tables.read().await;
        Ok(tables
            .feedback
            .values()
            .rev()
            .filter(|feedback| feedback.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_feedback(&self, id: i64) -> DaoResult<bool> {
        Ok(self.tables.write().await.feedback.remove(&id).is_some())
    }
}

// endregion: --- FeedbackDao

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: "hash".into(),
            email: format!("{}@example.com", username),
            ..Default::default()
        }
    }

    fn new_item(name: &str) -> NewItem {
        NewItem {
            name: name.into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(new_user("neville")).await.unwrap();
        let err = store.create_user(new_user("neville")).await.unwrap_err();
        assert!(matches!(err, DaoError::Duplicate("Username")));
    }

    #[tokio::test]
    async fn bids_must_climb() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("seller")).await.unwrap();
        let item = store.create_item(seller.id, new_item("broom")).await.unwrap();

        let first = store
            .place_bid(NewBid {
                item_id: item.id,
                bidder_id: 2,
                bid_amount: 50,
            })
            .await
            .unwrap();
        let BidOutcome::Accepted {
            bid: first,
            previous_highest: None,
        } = first
        else {
            panic!("first bid should be accepted without a predecessor");
        };

        let rejected = store
            .place_bid(NewBid {
                item_id: item.id,
                bidder_id: 3,
                bid_amount: 50,
            })
            .await
            .unwrap();
        assert!(matches!(rejected, BidOutcome::Rejected(r) if r.highest_amount == 50));

        let second = store
            .place_bid(NewBid {
                item_id: item.id,
                bidder_id: 3,
                bid_amount: 75,
            })
            .await
            .unwrap();
        match second {
            BidOutcome::Accepted {
                previous_highest, ..
            } => assert_eq!(previous_highest, Some(first)),
            other => panic!("unexpected outcome {:?}", other),
        }

        let highest = store.retrieve_highest_bid(item.id).await.unwrap().unwrap();
        assert_eq!(highest.bid_amount, 75);
        assert_eq!(store.find_bids_by_item(item.id).await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_bids_serialize() {
        let store = Arc::new(MemoryStore::new());
        let seller = store.create_user(new_user("gringotts")).await.unwrap();
        let item = store.create_item(seller.id, new_item("vault key")).await.unwrap();
        let item_id = item.id;

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                let amount = (i * 7) % 20 + 1;
                tokio::spawn(async move {
                    store
                        .place_bid(NewBid {
                            item_id,
                            bidder_id: 100 + i,
                            bid_amount: amount,
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut accepted = Vec::new();
        for handle in handles {
            if let BidOutcome::Accepted { bid, .. } = handle.await.unwrap() {
                accepted.push(bid);
            }
        }
        accepted.sort_by_key(|bid| bid.id);

        assert!(!accepted.is_empty());
        for pair in accepted.windows(2) {
            assert!(pair[0].bid_amount < pair[1].bid_amount);
        }
        let highest = store.retrieve_highest_bid(item.id).await.unwrap().unwrap();
        assert_eq!(highest.bid_amount, 20);
        assert_eq!(
            store.find_bids_by_item(item.id).await.unwrap().len(),
            accepted.len()
        );
    }

    #[tokio::test]
    async fn bid_on_missing_item_is_reported() {
        let store = MemoryStore::new();
        let outcome = store
            .place_bid(NewBid {
                item_id: 404,
                bidder_id: 1,
                bid_amount: 10,
            })
            .await
            .unwrap();
        assert_eq!(outcome, BidOutcome::ItemNotFound);
    }

    #[tokio::test]
    async fn deleting_a_user_cascades() {
        let store = MemoryStore::new();
        let seller = store.create_user(new_user("draco")).await.unwrap();
        let bidder = store.create_user(new_user("crabbe")).await.unwrap();
        let item = store.create_item(seller.id, new_item("vanishing cabinet")).await.unwrap();
        store
            .place_bid(NewBid {
                item_id: item.id,
                bidder_id: bidder.id,
                bid_amount: 10,
            })
            .await
            .unwrap();
        store
            .create_feedback(NewFeedback {
                user_id: seller.id,
                rating: 2,
                feedback_description: "late delivery".into(),
            })
            .await
            .unwrap();

        assert!(store.delete_user(seller.id).await.unwrap());
        assert!(store.retrieve_item(item.id).await.unwrap().is_none());
        assert!(store.find_bids_by_item(item.id).await.unwrap().is_empty());
        assert!(store
            .retrieve_feedback_for_user(seller.id)
            .await
            .unwrap()
            .is_empty());
        assert!(!store.delete_user(seller.id).await.unwrap());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_newest_first() {
        let store = MemoryStore::new();
        store.create_item(1, new_item("Nimbus 2000")).await.unwrap();
        store.create_item(1, new_item("Cauldron")).await.unwrap();
        store.create_item(1, new_item("nimbus 2001")).await.unwrap();

        let found = store.search_items("NIMBUS").await.unwrap();
        let names: Vec<_> = found.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["nimbus 2001", "Nimbus 2000"]);
    }
}

// endregion: --- Tests

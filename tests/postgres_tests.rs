//! Runs against a live PostgreSQL database.
//!
//! `DATABASE_URL=postgres://... cargo test --test postgres_tests -- --ignored`

use chrono::Utc;
use std::sync::Arc;
use wizards_bay::bidding::BidOutcome;
use wizards_bay::dao::{BidDao, DaoError, ItemDao, UserDao};
use wizards_bay::database::DatabaseManager;
use wizards_bay::model::{NewBid, NewItem, NewUser, User};

async fn setup() -> Option<Arc<DatabaseManager>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let db_manager = DatabaseManager::connect(&url, 10)
        .await
        .expect("Failed to connect to database");
    db_manager
        .initialize_database()
        .await
        .expect("Failed to initialize schema");
    Some(Arc::new(db_manager))
}

/// Names unique to this run so reruns never collide
fn unique(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

async fn create_user(db_manager: &DatabaseManager, prefix: &str) -> User {
    let username = unique(prefix);
    db_manager
        .create_user(NewUser {
            email: format!("{}@example.com", username),
            username,
            password: "hash".into(),
            ..Default::default()
        })
        .await
        .expect("Failed to create user")
}

#[tokio::test]
#[ignore]
async fn test_duplicate_username_maps_to_duplicate() {
    let Some(db_manager) = setup().await else {
        return;
    };
    let user = create_user(&db_manager, "padma").await;

    let err = db_manager
        .create_user(NewUser {
            username: user.username.clone(),
            password: "hash".into(),
            email: "parvati@example.com".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DaoError::Duplicate("Username")));

    assert!(db_manager.delete_user(user.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_search_matches_wildcards_literally() {
    let Some(db_manager) = setup().await else {
        return;
    };
    let seller = create_user(&db_manager, "zonko").await;
    let tag = unique("joke");

    let literal = db_manager
        .create_item(
            seller.id,
            NewItem {
                name: format!("100% pure {}", tag),
                description: String::new(),
            },
        )
        .await
        .unwrap();
    db_manager
        .create_item(
            seller.id,
            NewItem {
                name: format!("1000 pure {}", tag),
                description: String::new(),
            },
        )
        .await
        .unwrap();

    let found = db_manager
        .search_items(&format!("0% PURE {}", tag))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, literal.id);

    db_manager.delete_user(seller.id).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_bids_serialize_on_item_lock() {
    let Some(db_manager) = setup().await else {
        return;
    };
    let seller = create_user(&db_manager, "borgin").await;
    let bidder = create_user(&db_manager, "burke").await;
    let item = db_manager
        .create_item(
            seller.id,
            NewItem {
                name: unique("opal necklace"),
                description: String::new(),
            },
        )
        .await
        .unwrap();
    let (item_id, bidder_id) = (item.id, bidder.id);

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let db_manager = db_manager.clone();
            tokio::spawn(async move {
                db_manager
                    .place_bid(NewBid {
                        item_id,
                        bidder_id,
                        bid_amount: (i * 3) % 10 + 1,
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

    for pair in accepted.windows(2) {
        assert!(pair[0].bid_amount < pair[1].bid_amount);
    }
    let highest = db_manager
        .retrieve_highest_bid(item_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(highest.bid_amount, 10);
    assert_eq!(
        db_manager.find_bids_by_item(item_id).await.unwrap().len(),
        accepted.len()
    );

    // bidding after the item is gone reports it instead of failing the insert
    assert!(db_manager.delete_item(item_id).await.unwrap());
    let outcome = db_manager
        .place_bid(NewBid {
            item_id,
            bidder_id,
            bid_amount: 99,
        })
        .await
        .unwrap();
    assert_eq!(outcome, BidOutcome::ItemNotFound);

    db_manager.delete_user(seller.id).await.unwrap();
    db_manager.delete_user(bidder.id).await.unwrap();
}

/// Bid acceptance rules
/// 1. The first bid on an item is always accepted
/// 2. Later bids must be strictly higher than the current highest bid
// region:    --- Imports
use crate::model::Bid;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Bid Evaluation

/// A bid that did not beat the current highest bid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Your bid must be higher than current highest bid: ${highest_amount}")]
pub struct BidRejection {
    pub highest_amount: i64,
}

/// Result of an attempt to place a bid
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    Accepted {
        bid: Bid,
        previous_highest: Option<Bid>,
    },
    Rejected(BidRejection),
    /// The item disappeared before the bid could be recorded
    ItemNotFound,
}

pub fn evaluate_bid(current_highest: Option<&Bid>, amount: i64) -> Result<(), BidRejection> {
    match current_highest {
        None => Ok(()),
        Some(highest) if amount > highest.bid_amount => Ok(()),
        Some(highest) => Err(BidRejection {
            highest_amount: highest.bid_amount,
        }),
    }
}

// endregion: --- Bid Evaluation

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bid(amount: i64) -> Bid {
        Bid {
            id: 1,
            item_id: 10,
            bidder_id: 3,
            bid_amount: amount,
            bid_time: Utc::now(),
        }
    }

    #[test]
    fn first_bid_is_accepted_unconditionally() {
        assert_eq!(evaluate_bid(None, 1), Ok(()));
    }

    #[test]
    fn higher_bid_is_accepted() {
        assert_eq!(evaluate_bid(Some(&bid(100)), 101), Ok(()));
    }

    #[test]
    fn equal_or_lower_bid_is_rejected_with_current_highest() {
        let highest = bid(100);
        assert_eq!(
            evaluate_bid(Some(&highest), 100),
            Err(BidRejection {
                highest_amount: 100
            })
        );
        let rejection = evaluate_bid(Some(&highest), 40).unwrap_err();
        assert_eq!(
            rejection.to_string(),
            "Your bid must be higher than current highest bid: $100"
        );
    }
}

// endregion: --- Tests

// region:    --- Users

/// Create a user and return the stored row
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, password, first_name, last_name, address, email)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, username, password, first_name, last_name, address, email, created_at
"#;

pub const GET_USER: &str = "SELECT id, username, password, first_name, last_name, address, email, created_at FROM users WHERE id = $1";

pub const GET_USER_BY_USERNAME: &str = "SELECT id, username, password, first_name, last_name, address, email, created_at FROM users WHERE username = $1";

/// Password is only replaced when `$6` is non-null
pub const UPDATE_USER: &str = r#"
    UPDATE users
    SET first_name = $2, last_name = $3, address = $4, email = $5, password = COALESCE($6, password)
    WHERE id = $1
    RETURNING id, username, password, first_name, last_name, address, email, created_at
"#;

pub const DELETE_USER: &str = "DELETE FROM users WHERE id = $1";

// endregion: --- Users

// region:    --- Items

pub const INSERT_ITEM: &str = r#"
    INSERT INTO items (name, description, seller_id)
    VALUES ($1, $2, $3)
    RETURNING id, name, description, seller_id, created_at
"#;

pub const GET_ITEM: &str =
    "SELECT id, name, description, seller_id, created_at FROM items WHERE id = $1";

pub const GET_ALL_ITEMS: &str =
    "SELECT id, name, description, seller_id, created_at FROM items ORDER BY created_at DESC, id DESC";

pub const GET_ITEMS_BY_SELLER: &str = r#"
    SELECT id, name, description, seller_id, created_at
    FROM items
    WHERE seller_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// `$1` is an ILIKE pattern
pub const SEARCH_ITEMS: &str = r#"
    SELECT id, name, description, seller_id, created_at
    FROM items
    WHERE name ILIKE $1 OR description ILIKE $1
    ORDER BY created_at DESC, id DESC
"#;

pub const UPDATE_ITEM: &str = r#"
    UPDATE items SET name = $2, description = $3
    WHERE id = $1
    RETURNING id, name, description, seller_id, created_at
"#;

pub const DELETE_ITEM: &str = "DELETE FROM items WHERE id = $1";

// Serializes concurrent bids on one item for the rest of the transaction
pub const LOCK_ITEM: &str = "SELECT id FROM items WHERE id = $1 FOR UPDATE";

// endregion: --- Items

// region:    --- Bids

pub const INSERT_BID: &str = r#"
    INSERT INTO bids (item_id, bidder_id, bid_amount)
    VALUES ($1, $2, $3)
    RETURNING id, item_id, bidder_id, bid_amount, bid_time
"#;

pub const GET_BID: &str =
    "SELECT id, item_id, bidder_id, bid_amount, bid_time FROM bids WHERE id = $1";

/// Highest bid on an item; the earliest wins a tie
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, item_id, bidder_id, bid_amount, bid_time
    FROM bids
    WHERE item_id = $1
    ORDER BY bid_amount DESC, bid_time ASC, id ASC
    LIMIT 1
"#;

/// Bid history for an item, newest first
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, item_id, bidder_id, bid_amount, bid_time
    FROM bids
    WHERE item_id = $1
    ORDER BY bid_time DESC, id DESC
"#;

pub const DELETE_BID: &str = "DELETE FROM bids WHERE id = $1";

// endregion: --- Bids

// region:    --- Feedback

pub const INSERT_FEEDBACK: &str = r#"
    INSERT INTO feedback (user_id, rating, feedback_description)
    VALUES ($1, $2, $3)
    RETURNING id, user_id, rating, feedback_description, created_at
"#;

pub const GET_FEEDBACK: &str =
    "SELECT id, user_id, rating, feedback_description, created_at FROM feedback WHERE id = $1";

pub const GET_FEEDBACK_FOR_USER: &str = r#"
    SELECT id, user_id, rating, feedback_description, created_at
    FROM feedback
    WHERE user_id = $1
    ORDER BY created_at DESC, id DESC
"#;

pub const DELETE_FEEDBACK: &str = "DELETE FROM feedback WHERE id = $1";

// endregion: --- Feedback

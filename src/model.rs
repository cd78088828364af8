// region:    --- Imports
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Column Limits

pub const MAX_USERNAME_LEN: usize = 64;
pub const MAX_PERSON_NAME_LEN: usize = 128;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_ITEM_NAME_LEN: usize = 255;

/// Reject values longer than their VARCHAR column
fn check_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

// endregion: --- Column Limits

// region:    --- User

/// Registered user. `password` holds an argon2 PHC hash and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Sign-up payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::BadRequest("Username must not be empty".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest("Password must not be empty".into()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::BadRequest("Email must not be empty".into()));
        }
        check_length("Username", &self.username, MAX_USERNAME_LEN)?;
        check_length("First name", &self.first_name, MAX_PERSON_NAME_LEN)?;
        check_length("Last name", &self.last_name, MAX_PERSON_NAME_LEN)?;
        check_length("Email", &self.email, MAX_EMAIL_LEN)
    }
}

/// Profile update. An empty or missing password leaves the stored hash untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.email.trim().is_empty() {
            return Err(AppError::BadRequest("Email must not be empty".into()));
        }
        check_length("First name", &self.first_name, MAX_PERSON_NAME_LEN)?;
        check_length("Last name", &self.last_name, MAX_PERSON_NAME_LEN)?;
        check_length("Email", &self.email, MAX_EMAIL_LEN)
    }
}

// endregion: --- User

// region:    --- Item

/// Item listed for auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub seller_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing an item. The seller comes from the credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Item name must not be empty".into()));
        }
        check_length("Item name", &self.name, MAX_ITEM_NAME_LEN)
    }
}

// endregion: --- Item

// region:    --- Bid

// Bid model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub item_id: i64,
    pub bidder_id: i64,
    pub bid_amount: i64,
    pub bid_time: DateTime<Utc>,
}

/// Bid request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBid {
    pub item_id: i64,
    pub bidder_id: i64,
    pub bid_amount: i64,
}

// endregion: --- Bid

// region:    --- Feedback

/// Feedback left for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub feedback_description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub user_id: i64,
    pub rating: i32,
    #[serde(default)]
    pub feedback_description: String,
}

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

impl NewFeedback {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(AppError::BadRequest(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        if self.feedback_description.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Feedback description must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// endregion: --- Feedback

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serialization_omits_password() {
        let user = User {
            id: 7,
            username: "harry".into(),
            password: "$argon2id$v=19$secret".into(),
            first_name: "Harry".into(),
            last_name: "Potter".into(),
            address: "4 Privet Drive".into(),
            email: "harry@hogwarts.edu".into(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "harry");
    }

    #[test]
    fn new_user_requires_credentials_and_email() {
        let mut user = NewUser {
            username: "ron".into(),
            password: "scabbers".into(),
            email: "ron@hogwarts.edu".into(),
            ..Default::default()
        };
        assert!(user.validate().is_ok());

        user.username = "   ".into();
        assert!(matches!(user.validate(), Err(AppError::BadRequest(_))));

        user.username = "ron".into();
        user.email.clear();
        assert!(matches!(user.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn values_longer_than_their_column_are_rejected() {
        let mut user = NewUser {
            username: "n".repeat(MAX_USERNAME_LEN),
            password: "x".into(),
            email: "nearly-headless@hogwarts.edu".into(),
            ..Default::default()
        };
        assert!(user.validate().is_ok());

        user.username.push('n');
        assert!(matches!(user.validate(), Err(AppError::BadRequest(_))));

        // limits count characters, not bytes
        user.username = "é".repeat(MAX_USERNAME_LEN);
        assert!(user.validate().is_ok());

        let update = UserUpdate {
            last_name: "x".repeat(MAX_PERSON_NAME_LEN + 1),
            email: "a@b.c".into(),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let item = NewItem {
            name: "w".repeat(MAX_ITEM_NAME_LEN + 1),
            description: String::new(),
        };
        assert!(item.validate().is_err());
    }

    #[test]
    fn feedback_rating_must_be_in_range() {
        let mut feedback = NewFeedback {
            user_id: 1,
            rating: 5,
            feedback_description: "fast shipping".into(),
        };
        assert!(feedback.validate().is_ok());

        feedback.rating = 0;
        assert!(feedback.validate().is_err());

        feedback.rating = 6;
        assert!(feedback.validate().is_err());
    }

    #[test]
    fn missing_optional_fields_deserialize_to_empty() {
        let item: NewItem = serde_json::from_str(r#"{"name":"Elder Wand"}"#).unwrap();
        assert_eq!(item.description, "");
        assert!(item.validate().is_ok());
    }
}

// endregion: --- Tests

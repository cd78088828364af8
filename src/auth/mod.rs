//! HTTP Basic authentication.
//!
//! Handlers that take an [`AuthUser`] argument are protected: the extractor
//! reads `Authorization: Basic ...`, loads the user by name and checks the
//! password hash. Any failure yields a 401 challenge.

// region:    --- Imports
use crate::error::AppError;
use crate::model::User;
use crate::state::AppState;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use tracing::{debug, info};

// endregion: --- Imports

pub mod password;

pub use password::{hash_password, reject_unknown_user, verify_password};

/// The user whose credentials accompanied the request
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(credentials) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    debug!("{:<12} --> missing or malformed credentials", "Auth");
                    AppError::Unauthorized
                })?;

        let app = AppState::from_ref(state);
        let Some(user) = app
            .store
            .retrieve_user_by_username(credentials.username())
            .await?
        else {
            reject_unknown_user(credentials.password());
            debug!("{:<12} --> unknown user {}", "Auth", credentials.username());
            return Err(AppError::Unauthorized);
        };

        if !verify_password(credentials.password(), &user.password) {
            info!(
                "{:<12} --> rejected credentials for {}",
                "Auth",
                credentials.username()
            );
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser(user))
    }
}

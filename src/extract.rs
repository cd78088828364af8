//! Extractors whose rejections are [`AppError`]s.
//!
//! axum's own `Json`, `Path` and `Query` answer a bad request themselves with
//! a plain-text body. These wrappers route the failure through [`AppError`]
//! so it is logged and serialized like any other error.

// region:    --- Imports
use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

// endregion: --- Imports

/// JSON request body, also usable as a response
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

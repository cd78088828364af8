//! Hello-world scaffold server.
//!
//! A templated greeting, a Basic-auth-protected page, static assets, and the
//! same user and item resources as the marketplace.

// region:    --- Imports
use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::extract::{Json, Query};
use crate::handlers;
use crate::state::AppState;
use axum::extract::{FromRef, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::info;

// endregion: --- Imports

pub mod template;

pub use template::{Saying, Template};

// region:    --- State

#[derive(Clone)]
pub struct HelloState {
    pub app: AppState,
    pub template: Arc<Template>,
    counter: Arc<AtomicI64>,
}

impl HelloState {
    pub fn new(app: AppState, template: Template) -> Self {
        Self {
            app,
            template: Arc::new(template),
            counter: Arc::new(AtomicI64::new(0)),
        }
    }
}

impl FromRef<HelloState> for AppState {
    fn from_ref(state: &HelloState) -> Self {
        state.app.clone()
    }
}

// endregion: --- State

// region:    --- Handlers

#[derive(Debug, Deserialize)]
pub struct HelloParams {
    pub name: Option<String>,
}

pub async fn handle_say_hello(
    State(state): State<HelloState>,
    Query(params): Query<HelloParams>,
) -> Json<Saying> {
    let id = state.counter.fetch_add(1, Ordering::Relaxed) + 1;
    let content = state.template.render(params.name.as_deref());
    info!("{:<12} --> saying {}: {}", "HandlerHello", id, content);
    Json(Saying { id, content })
}

pub async fn handle_protected(auth: AuthUser) -> String {
    info!("{:<12} --> protected page for {}", "HandlerHello", auth.username());
    format!("Hey there, {}. You know the secret!", auth.username())
}

// endregion: --- Handlers

// region:    --- Router

pub fn router(config: &AppConfig, app: AppState) -> Router {
    let template = Template::new(&config.hello_template, &config.hello_default_name);
    let hello = Router::new()
        .route("/hello-world", get(handle_say_hello))
        .route("/protected", get(handle_protected))
        .with_state(HelloState::new(app.clone(), template));

    let resources = Router::new()
        .merge(handlers::users::routes())
        .merge(handlers::items::routes())
        .with_state(app);

    let router = hello
        .merge(resources)
        .nest_service("/assets", ServeDir::new(&config.assets_dir));

    handlers::with_common_layers(router)
}

// endregion: --- Router

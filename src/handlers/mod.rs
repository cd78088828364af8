// region:    --- Imports
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// endregion: --- Imports

// region:    --- Modules
pub mod bids;
pub mod feedback;
pub mod items;
pub mod users;

// endregion: --- Modules

// region:    --- Router

/// Request bodies are small JSON documents
const BODY_LIMIT: usize = 1024 * 1024;

/// User, item, bid and feedback resources without state
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(items::routes())
        .merge(bids::routes())
        .merge(feedback::routes())
}

/// The marketplace application
pub fn router(state: AppState) -> Router {
    with_common_layers(api_routes().with_state(state))
}

/// CORS, request tracing and the body limit shared by both servers
pub fn with_common_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

// endregion: --- Router

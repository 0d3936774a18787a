use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod location;
pub mod weather;

/// Build the application router with every endpoint mounted under `/api`.
pub fn build(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(location::router())
        .merge(weather::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

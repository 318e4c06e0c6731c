use axum::middleware;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::auth::require_bearer;
use crate::routes::{analytics, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let api = analytics::router()
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

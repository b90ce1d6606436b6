use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use shared::protocol::parties_route;
use tower_http::trace::TraceLayer;

pub mod api;
mod app_state;
pub mod config;

use api::{
    healthz, http_create_party, http_delete_party, http_get_party, http_list_parties,
    http_update_party,
};
pub use app_state::AppState;

pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            parties_route(),
            get(http_list_parties).post(http_create_party),
        )
        .route(
            &format!("{}/:id", parties_route()),
            get(http_get_party)
                .put(http_update_party)
                .delete(http_delete_party),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

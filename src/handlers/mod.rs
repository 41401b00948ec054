pub mod conversations;
pub mod recommendations;

#[cfg(test)]
mod test_handlers;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

use crate::service::AdvisorService;

/// Shared handler state, constructed once at startup.
pub struct AppState {
    pub service: AdvisorService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/conversations", post(conversations::create_conversation))
        .route("/api/conversations/:id", get(conversations::get_conversation))
        .route(
            "/api/conversations/:id/messages",
            post(conversations::post_message),
        )
        .route(
            "/api/conversations/:id/recommendations",
            post(conversations::request_recommendations),
        )
        .route(
            "/api/recommendations",
            post(recommendations::generate_recommendations),
        )
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}

//! Route definitions
//!
//! REST routes mounted under /api, the WebSocket endpoint at /ws, and the
//! health probes at the root.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{groups, health, messages, ws};
use crate::state::AppState;

/// Create the main router with all API and WebSocket routes
/// (excluding health, which bypasses rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws", get(ws::ws_handler))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        // Group CRUD
        .route("/groups", get(groups::list_groups))
        .route("/groups", post(groups::create_group))
        .route("/groups/:group_id", get(groups::get_group))
        .route("/groups/:group_id", patch(groups::update_group))
        .route("/groups/:group_id", delete(groups::delete_group))
        // Group membership
        .route("/groups/:group_id/join", post(groups::join_group))
        .route("/groups/:group_id/kick", post(groups::kick_member))
        // Group messages
        .route("/groups/:group_id/messages", get(messages::list_messages))
        .route("/groups/:group_id/messages", post(messages::post_message))
        // Message operations
        .route("/messages/:message_id", delete(messages::delete_message))
        .route(
            "/messages/:message_id/reactions",
            post(messages::toggle_reaction),
        )
}

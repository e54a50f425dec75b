//! Web server module for receiving Tribute webhooks.
//!
//! Routes:
//! - `GET /health`: liveness probe
//! - `GET /subscribe`: websocket push channel of processed events
//! - any configured webhook path: signed event delivery

pub mod handlers;
pub mod socket;
pub mod webhook;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{health, webhook_route, AppState, HealthResponse};
pub use socket::{subscribe_socket, ClientCommand, SubscribeQuery};
pub use webhook::{WebhookEndpoint, WebhookReply, SIGNATURE_HEADERS};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/subscribe", get(subscribe_socket))
        .fallback(webhook_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

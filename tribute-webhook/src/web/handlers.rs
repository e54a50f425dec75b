//! HTTP route handlers.
//!
//! Webhook paths are not registered as routes: any unmatched request falls
//! through to [`webhook_route`], which looks the normalized path up in the
//! configured secrets.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::config::normalize_webhook_path;
use crate::subscriptions::{EventNotifier, SubscriptionManager};
use crate::web::webhook::WebhookEndpoint;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub subscriptions: Arc<SubscriptionManager>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            subscriptions: Arc::new(SubscriptionManager::new()),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// =============================================================================
// Webhooks
// =============================================================================

/// Serve a request on any configured webhook path.
pub async fn webhook_route(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = normalize_webhook_path(uri.path());

    if path == "/health" {
        return health().await.into_response();
    }

    let Some(secret) = state.config.secret_for(&path) else {
        warn!(path = %path, method = %method, "webhook_endpoint_not_configured");
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();
    };

    let notifier: Arc<dyn EventNotifier> = state.subscriptions.clone();
    WebhookEndpoint::new(&path, secret.clone())
        .with_notifier(notifier)
        .handle(&method, &headers, &body)
        .into_response()
}

//! Signed webhook endpoint.
//!
//! Each request is handled in a fixed order:
//! 1. Method, secret and body checks
//! 2. Signature verification over the raw body bytes
//! 3. JSON parsing and event dispatch
//! 4. Notification of live subscribers
//!
//! Every signature rejection produces the same response body, whatever the
//! underlying reason.

use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::config::{normalize_webhook_path, Secret};
use crate::event::TributeEvent;
use crate::process::dispatch_event;
use crate::signature::verify_tribute_signature;
use crate::subscriptions::EventNotifier;

/// Header names Tribute has used for the signature, checked in order.
pub const SIGNATURE_HEADERS: &[&str] = &["trbt-signature", "x-trbt-signature"];

/// Status and JSON body returned to the caller.
pub type WebhookReply = (StatusCode, Json<Value>);

/// A configured webhook path together with its secret.
pub struct WebhookEndpoint {
    path: String,
    secret: Secret,
    notifier: Option<Arc<dyn EventNotifier>>,
}

impl WebhookEndpoint {
    pub fn new(path: &str, secret: Secret) -> Self {
        Self {
            path: normalize_webhook_path(path),
            secret,
            notifier: None,
        }
    }

    /// Notify `notifier` after each successfully dispatched event.
    pub fn with_notifier(mut self, notifier: Arc<dyn EventNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Handle one delivery. `body` must be the unmodified request body.
    pub fn handle(&self, method: &Method, headers: &HeaderMap, body: &[u8]) -> WebhookReply {
        let endpoint = self.path();
        info!(endpoint = %endpoint, method = %method, body_length = body.len(), "webhook_received");

        if *method != Method::POST {
            warn!(endpoint = %endpoint, method = %method, "webhook_method_not_allowed");
            return reply(
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "method not allowed", "method": method.as_str() }),
            );
        }

        if self.secret.is_empty() {
            error!(endpoint = %endpoint, "webhook_secret_not_configured");
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "server misconfigured" }),
            );
        }

        if body.is_empty() {
            warn!(endpoint = %endpoint, "webhook_empty_body");
            return reply(StatusCode::BAD_REQUEST, json!({ "error": "empty body" }));
        }

        let signature = signature_header(headers);
        if signature.is_none() {
            warn!(endpoint = %endpoint, "webhook_signature_missing");
            return invalid_signature();
        }

        match verify_tribute_signature(signature, self.secret.expose(), body) {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    endpoint = %endpoint,
                    signature_length = signature.map(str::len).unwrap_or(0),
                    "webhook_signature_invalid"
                );
                return invalid_signature();
            }
            Err(e) => {
                error!(endpoint = %endpoint, error = %e, "webhook_signature_unavailable");
                return reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal error" }),
                );
            }
        }

        let raw_event: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "webhook_invalid_json");
                return reply(StatusCode::BAD_REQUEST, json!({ "error": "invalid json" }));
            }
        };

        let event: TributeEvent = match serde_json::from_value(raw_event.clone()) {
            Ok(e) => e,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "webhook_invalid_event");
                return reply(StatusCode::BAD_REQUEST, json!({ "error": "invalid event" }));
            }
        };

        let result = dispatch_event(&event);
        info!(
            endpoint = %endpoint,
            event = %event.name,
            status = result.status.as_u16(),
            "webhook_processed"
        );

        if let Some(notifier) = &self.notifier {
            notifier.notify(endpoint, &raw_event, &result);
        }

        (result.status, Json(result.body))
    }
}

fn signature_header(headers: &HeaderMap) -> Option<&str> {
    SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
}

fn reply(status: StatusCode, body: Value) -> WebhookReply {
    (status, Json(body))
}

fn invalid_signature() -> WebhookReply {
    reply(StatusCode::UNAUTHORIZED, json!({ "error": "invalid signature" }))
}

//! Digital product purchases.

use serde_json::json;
use tracing::info;

use crate::event::{HandlerResult, TributeEvent};

/// Acknowledge a digital product purchase.
pub fn handle_new_digital_product(event: &TributeEvent) -> HandlerResult {
    info!(payload = %event.payload, "new_digital_product");
    HandlerResult::ok(json!({ "ok": true }))
}

//! Dispatch of verified Tribute events to per-event handlers.

pub mod digital_product;
pub mod payment;

use serde_json::json;
use tracing::info;

use crate::event::{HandlerResult, TributeEvent};

pub use digital_product::handle_new_digital_product;
pub use payment::{handle_payment_completed, PAYMENT_COMPLETED_EVENTS};

/// Route an event to its handler by name.
///
/// Unknown events are acknowledged with `200` so Tribute does not retry them.
pub fn dispatch_event(event: &TributeEvent) -> HandlerResult {
    if PAYMENT_COMPLETED_EVENTS.contains(&event.name.as_str()) {
        info!(event = %event.name, handler = "payment_completed", "event_routing");
        return handle_payment_completed(event);
    }

    if event.name == "new_digital_product" {
        info!(event = %event.name, handler = "new_digital_product", "event_routing");
        return handle_new_digital_product(event);
    }

    info!(event = %event.name, "event_unhandled");
    HandlerResult::ok(json!({
        "ok": true,
        "received": event.name,
    }))
}

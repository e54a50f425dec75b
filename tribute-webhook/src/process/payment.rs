//! Payment-completed events.

use serde_json::json;
use tracing::{info, warn};

use crate::event::{HandlerResult, PaymentCompletedPayload, TributeEvent};

/// Event names Tribute has used for a completed payment.
pub const PAYMENT_COMPLETED_EVENTS: &[&str] =
    &["payment.completed", "payment_completed", "payment_succeeded"];

/// Acknowledge a completed payment and echo its identifier.
pub fn handle_payment_completed(event: &TributeEvent) -> HandlerResult {
    let payload: PaymentCompletedPayload =
        serde_json::from_value(event.payload.clone()).unwrap_or_default();
    let payment_id = payload.payment_id();

    match payment_id {
        Some(id) => info!(event = %event.name, payment_id = %id, "payment_completed"),
        None => warn!(
            event = %event.name,
            payload = %event.payload,
            "payment_completed_missing_id"
        ),
    }

    HandlerResult::ok(json!({
        "ok": true,
        "event": event.name,
        "paymentId": payment_id,
    }))
}

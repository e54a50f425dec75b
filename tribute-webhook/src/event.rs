//! Tribute event envelope and handler results.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event envelope delivered by Tribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TributeEvent {
    /// Event name, e.g. `payment_completed`
    pub name: String,
    /// Event-specific payload
    #[serde(default)]
    pub payload: Value,
    /// Creation time as sent; Tribute has used both strings and epoch numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
}

/// Payload of the payment-completed family of events.
///
/// Older events carry the identifier as `id`, newer ones as `payment_id`.
/// Both are kept untyped so a malformed one does not hide the other.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentCompletedPayload {
    #[serde(default)]
    pub payment_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentCompletedPayload {
    /// First non-empty string among `payment_id` and `id`.
    pub fn payment_id(&self) -> Option<&str> {
        [self.payment_id.as_ref(), self.id.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|id| !id.is_empty())
    }
}

/// Outcome of dispatching an event: the HTTP status and JSON body to return.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResult {
    pub status: StatusCode,
    pub body: Value,
}

impl HandlerResult {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserialization() {
        let event: TributeEvent = serde_json::from_value(json!({
            "name": "payment_completed",
            "payload": {"payment_id": "pay_1"},
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(event.name, "payment_completed");
        assert_eq!(event.payload["payment_id"], "pay_1");
        assert_eq!(event.created_at, Some(json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn test_event_accepts_numeric_created_at() {
        let event: TributeEvent = serde_json::from_value(json!({
            "name": "payment_completed",
            "created_at": 1700000000
        }))
        .unwrap();
        assert_eq!(event.created_at, Some(json!(1700000000)));
    }

    #[test]
    fn test_event_payload_defaults_to_null() {
        let event: TributeEvent = serde_json::from_value(json!({"name": "ping"})).unwrap();
        assert!(event.payload.is_null());
    }

    #[test]
    fn test_event_requires_string_name() {
        assert!(serde_json::from_value::<TributeEvent>(json!({"name": 5})).is_err());
        assert!(serde_json::from_value::<TributeEvent>(json!({"payload": {}})).is_err());
    }

    #[test]
    fn test_payment_id_preference() {
        let payload: PaymentCompletedPayload =
            serde_json::from_value(json!({"payment_id": "pay_1", "id": "id_1"})).unwrap();
        assert_eq!(payload.payment_id(), Some("pay_1"));

        let payload: PaymentCompletedPayload =
            serde_json::from_value(json!({"payment_id": "", "id": "id_1", "amount": 10})).unwrap();
        assert_eq!(payload.payment_id(), Some("id_1"));
        assert_eq!(payload.extra["amount"], 10);

        let payload: PaymentCompletedPayload = serde_json::from_value(json!({"id": ""})).unwrap();
        assert_eq!(payload.payment_id(), None);

        let payload: PaymentCompletedPayload =
            serde_json::from_value(json!({"payment_id": 123, "id": "pay_x"})).unwrap();
        assert_eq!(payload.payment_id(), Some("pay_x"));
    }
}

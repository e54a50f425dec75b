//! Tribute webhook receiver.
//!
//! Authenticates Tribute payment callbacks by HMAC-SHA256 signature over the
//! raw request body, dispatches the event by name, and pushes processed
//! events to live websocket subscribers.
//!
//! ## Architecture
//!
//! ```text
//! POST /<path> → secret lookup → signature check → dispatch → response
//!                                                      ↘ subscribers
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod process;
pub mod signature;
pub mod subscriptions;
pub mod web;

// Re-export commonly used types
pub use config::{normalize_webhook_path, Config, Secret};
pub use error::{CodecError, SignatureError};
pub use event::{HandlerResult, PaymentCompletedPayload, TributeEvent};
pub use process::dispatch_event;
pub use signature::verify_tribute_signature;
pub use subscriptions::{EventNotifier, SubscriptionManager, SubscriptionMessage};
pub use web::{router, AppState, WebhookEndpoint};

//! Live fan-out of processed events to push-channel subscribers.
//!
//! Each connected socket gets a [`SubscriberId`] and an outbound queue.
//! Sockets subscribe to endpoint paths; a processed webhook on that path is
//! broadcast to every subscriber of it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::normalize_webhook_path;
use crate::event::HandlerResult;

/// Identifier of a connected subscriber.
pub type SubscriberId = u64;

/// Messages pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SubscriptionMessage {
    Subscribed {
        endpoint: String,
    },
    Unsubscribed {
        endpoint: String,
    },
    Event {
        endpoint: String,
        event: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    Error {
        message: String,
    },
}

/// Receives processed events once a webhook has been verified and dispatched.
pub trait EventNotifier: Send + Sync {
    fn notify(&self, endpoint: &str, event: &Value, result: &HandlerResult);
}

#[derive(Default)]
struct Registry {
    /// Outbound queue per connected subscriber
    senders: HashMap<SubscriberId, mpsc::UnboundedSender<String>>,
    /// Subscribers per normalized endpoint
    channels: HashMap<String, HashSet<SubscriberId>>,
}

/// One-to-many broadcast registry keyed by endpoint path.
#[derive(Default)]
pub struct SubscriptionManager {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // The registry holds no invariants a panicking holder could break.
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new subscriber and return its outbound queue.
    pub fn connect(&self) -> (SubscriberId, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry().senders.insert(id, tx);
        debug!(subscriber_id = id, "subscriber_connected");
        (id, rx)
    }

    pub fn subscribe(&self, endpoint: &str, id: SubscriberId) {
        let endpoint = normalize_webhook_path(endpoint);
        self.registry()
            .channels
            .entry(endpoint.clone())
            .or_default()
            .insert(id);
        debug!(subscriber_id = id, endpoint = %endpoint, "subscriber_subscribed");
    }

    pub fn unsubscribe(&self, endpoint: &str, id: SubscriberId) {
        let endpoint = normalize_webhook_path(endpoint);
        let mut registry = self.registry();
        let Some(ids) = registry.channels.get_mut(&endpoint) else {
            return;
        };
        ids.remove(&id);
        if ids.is_empty() {
            registry.channels.remove(&endpoint);
        }
    }

    /// Send `message` to every subscriber of `endpoint`.
    ///
    /// Returns the number of subscribers the message was queued for.
    pub fn broadcast(&self, endpoint: &str, message: &SubscriptionMessage) -> usize {
        let endpoint = normalize_webhook_path(endpoint);
        let registry = self.registry();
        let Some(ids) = registry.channels.get(&endpoint) else {
            return 0;
        };
        if ids.is_empty() {
            return 0;
        }

        let serialized = match serde_json::to_string(message) {
            Ok(s) => s,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "subscription_serialize_failed");
                return 0;
            }
        };

        let mut delivered = 0;
        for id in ids {
            match registry.senders.get(id) {
                Some(tx) if tx.send(serialized.clone()).is_ok() => delivered += 1,
                _ => warn!(endpoint = %endpoint, subscriber_id = id, "subscription_delivery_failed"),
            }
        }
        delivered
    }

    /// Send `message` to a single subscriber.
    pub fn send_to(&self, id: SubscriberId, message: &SubscriptionMessage) -> bool {
        let serialized = match serde_json::to_string(message) {
            Ok(s) => s,
            Err(e) => {
                warn!(subscriber_id = id, error = %e, "subscription_serialize_failed");
                return false;
            }
        };
        self.registry()
            .senders
            .get(&id)
            .map(|tx| tx.send(serialized).is_ok())
            .unwrap_or(false)
    }

    /// Remove a subscriber from every channel and drop its queue.
    pub fn clear(&self, id: SubscriberId) {
        let mut registry = self.registry();
        registry.senders.remove(&id);
        registry.channels.retain(|_, ids| {
            ids.remove(&id);
            !ids.is_empty()
        });
        debug!(subscriber_id = id, "subscriber_cleared");
    }

    pub fn subscriber_count(&self, endpoint: &str) -> usize {
        self.registry()
            .channels
            .get(&normalize_webhook_path(endpoint))
            .map(HashSet::len)
            .unwrap_or(0)
    }
}

impl EventNotifier for SubscriptionManager {
    fn notify(&self, endpoint: &str, event: &Value, result: &HandlerResult) {
        let endpoint = normalize_webhook_path(endpoint);
        let message = SubscriptionMessage::Event {
            endpoint: endpoint.clone(),
            event: event.clone(),
            metadata: Some(json!({ "status": result.status.as_u16() })),
        };
        let delivered = self.broadcast(&endpoint, &message);
        if delivered > 0 {
            debug!(endpoint = %endpoint, subscribers = delivered, "event_broadcast");
        }
    }
}

//! WebSocket push channel for live event subscribers.
//!
//! Clients connect to `/subscribe`, optionally with `?endpoint=/path`, and
//! send text frames of the form `{"action":"subscribe","endpoint":"/path"}`
//! or `{"action":"unsubscribe","endpoint":"/path"}`.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::normalize_webhook_path;
use crate::subscriptions::{SubscriberId, SubscriptionMessage};
use crate::web::AppState;

/// Query string of the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeQuery {
    pub endpoint: Option<String>,
}

/// Frames a client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientCommand {
    Subscribe { endpoint: String },
    Unsubscribe { endpoint: String },
}

/// Upgrade endpoint for the push channel.
pub async fn subscribe_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SubscribeQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.endpoint))
}

async fn handle_socket(socket: WebSocket, state: AppState, initial_endpoint: Option<String>) {
    let (id, mut outbound) = state.subscriptions.connect();
    let (mut ws_sender, mut ws_receiver) = socket.split();
    info!(subscriber_id = id, "subscriber_socket_open");

    let send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    if let Some(endpoint) = initial_endpoint {
        apply_command(&state, id, ClientCommand::Subscribe { endpoint });
    }

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => handle_client_text(&state, id, &text),
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(subscriber_id = id, error = %e, "subscriber_socket_error");
                break;
            }
        }
    }

    state.subscriptions.clear(id);
    send_task.abort();
    info!(subscriber_id = id, "subscriber_socket_closed");
}

/// Parse and apply one client frame.
pub(crate) fn handle_client_text(state: &AppState, id: SubscriberId, text: &str) {
    match serde_json::from_str::<ClientCommand>(text) {
        Ok(command) => apply_command(state, id, command),
        Err(e) => {
            warn!(subscriber_id = id, error = %e, "subscriber_invalid_message");
            state.subscriptions.send_to(
                id,
                &SubscriptionMessage::Error {
                    message: "invalid message".to_string(),
                },
            );
        }
    }
}

fn apply_command(state: &AppState, id: SubscriberId, command: ClientCommand) {
    match command {
        ClientCommand::Subscribe { endpoint } => {
            let endpoint = normalize_webhook_path(&endpoint);
            if state.config.secret_for(&endpoint).is_none() {
                warn!(subscriber_id = id, endpoint = %endpoint, "subscriber_unknown_endpoint");
                state.subscriptions.send_to(
                    id,
                    &SubscriptionMessage::Error {
                        message: "unknown endpoint".to_string(),
                    },
                );
                return;
            }
            state.subscriptions.subscribe(&endpoint, id);
            state
                .subscriptions
                .send_to(id, &SubscriptionMessage::Subscribed { endpoint });
        }
        ClientCommand::Unsubscribe { endpoint } => {
            let endpoint = normalize_webhook_path(&endpoint);
            state.subscriptions.unsubscribe(&endpoint, id);
            state
                .subscriptions
                .send_to(id, &SubscriptionMessage::Unsubscribed { endpoint });
        }
    }
}

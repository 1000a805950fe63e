//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::ConnectionHub;
use super::messages::{ClientMessage, ServerMessage, WINDOW_TOPIC};
use crate::api::AppState;
use crate::presenter::LatestFrame;

/// WebSocket upgrade handler
///
/// Entry point for `/ws`: upgrades the HTTP connection and starts message
/// handling.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.ws_hub);
    let latest = state.latest.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub, latest))
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<ConnectionHub>, latest: LatestFrame) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(tx) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register WebSocket connection");
            if let Some(msg) = encode(&ServerMessage::Error {
                message: e.to_string(),
            }) {
                let _ = sender.send(msg).await;
            }
            return;
        }
    };

    let connected = encode(&ServerMessage::Connected {
        connection_id: connection_id.clone(),
    });
    let sent = match connected {
        Some(msg) => sender.send(msg).await.is_ok(),
        None => false,
    };
    if !sent {
        tracing::error!(connection_id = %connection_id, "Failed to send connected message");
        hub.unregister(&connection_id);
        return;
    }

    let conn_id_for_send = connection_id.clone();

    // Forward queued messages to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Some(frame) = encode(&msg) else {
                continue;
            };
            if sender.send(frame).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let conn_id_for_recv = connection_id.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &latest, &conn_id_for_recv, msg) {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.unregister(&connection_id);
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
fn handle_ws_message(
    hub: &ConnectionHub,
    latest: &LatestFrame,
    connection_id: &str,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(hub, latest, connection_id, client_msg);
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(connection_id, error_msg);
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg);
            true
        }
        // axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
fn handle_client_message(
    hub: &ConnectionHub,
    latest: &LatestFrame,
    connection_id: &str,
    message: ClientMessage,
) {
    for reply in replies_for(hub, latest, connection_id, message) {
        let _ = hub.send_to(connection_id, reply);
    }
}

/// Messages owed to a connection in answer to one client message
///
/// Subscribing to the window topic also returns the frame currently on
/// screen so a fresh page does not wait a full cycle.
fn replies_for(
    hub: &ConnectionHub,
    latest: &LatestFrame,
    connection_id: &str,
    message: ClientMessage,
) -> Vec<ServerMessage> {
    match message {
        ClientMessage::Subscribe { topics } => match hub.subscribe(connection_id, topics) {
            Ok(subscribed) => {
                let wants_window = subscribed.iter().any(|t| t == WINDOW_TOPIC);
                let mut replies = vec![ServerMessage::Subscribed { topics: subscribed }];
                if wants_window {
                    replies.push(ServerMessage::Window {
                        frame: latest.current(),
                    });
                }
                replies
            }
            Err(e) => {
                tracing::error!(
                    connection_id = %connection_id,
                    error = %e,
                    "Subscribe error"
                );
                vec![ServerMessage::Error {
                    message: e.to_string(),
                }]
            }
        },
        ClientMessage::Unsubscribe { topics } => {
            match hub.unsubscribe(connection_id, topics) {
                Ok(unsubscribed) => vec![ServerMessage::Unsubscribed {
                    topics: unsubscribed,
                }],
                Err(e) => {
                    tracing::error!(
                        connection_id = %connection_id,
                        error = %e,
                        "Unsubscribe error"
                    );
                    vec![ServerMessage::Error {
                        message: e.to_string(),
                    }]
                }
            }
        }
        ClientMessage::Ping => vec![ServerMessage::Pong],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{WindowFrame, WindowSink};
    use crate::websocket::HubConfig;

    #[test]
    fn test_subscribe_window_sends_current_frame() {
        let hub = ConnectionHub::new(HubConfig::default());
        let latest = LatestFrame::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).unwrap();

        let replies = replies_for(
            &hub,
            &latest,
            &id,
            ClientMessage::Subscribe {
                topics: vec!["window".to_string()],
            },
        );

        assert_eq!(replies.len(), 2);
        assert!(matches!(replies[0], ServerMessage::Subscribed { .. }));
        match &replies[1] {
            ServerMessage::Window { frame } => assert_eq!(frame, &WindowFrame::empty()),
            other => panic!("Expected Window, got {:?}", other),
        }
    }

    #[test]
    fn test_subscribe_system_only() {
        let hub = ConnectionHub::new(HubConfig::default());
        let latest = LatestFrame::new();
        latest.display(&WindowFrame::empty());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).unwrap();

        let replies = replies_for(
            &hub,
            &latest,
            &id,
            ClientMessage::Subscribe {
                topics: vec!["system".to_string()],
            },
        );

        assert_eq!(replies.len(), 1);
    }

    #[test]
    fn test_ping_and_unknown_connection() {
        let hub = ConnectionHub::new(HubConfig::default());
        let latest = LatestFrame::new();

        let replies = replies_for(&hub, &latest, "nobody", ClientMessage::Ping);
        assert!(matches!(replies[..], [ServerMessage::Pong]));

        let replies = replies_for(
            &hub,
            &latest,
            "nobody",
            ClientMessage::Unsubscribe {
                topics: vec!["window".to_string()],
            },
        );
        assert!(matches!(replies[..], [ServerMessage::Error { .. }]));
    }
}

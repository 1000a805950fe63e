//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! the attendee display page and the FanZone server.

use serde::{Deserialize, Serialize};

use crate::presenter::WindowFrame;

/// Topic carrying attendee window frames
pub const WINDOW_TOPIC: &str = "window";

/// Topic carrying server notices
pub const SYSTEM_TOPIC: &str = "system";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for real-time updates
    Subscribe {
        /// List of topics to subscribe to ("window", "system")
        topics: Vec<String>,
    },
    /// Unsubscribe from topics
    Unsubscribe {
        /// List of topics to unsubscribe from
        topics: Vec<String>,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The attendee display moved to a new window
    Window {
        frame: WindowFrame,
    },
    /// Server notice
    Notice {
        message: String,
    },
    /// Subscription confirmed
    Subscribed {
        /// Topics successfully subscribed to
        topics: Vec<String>,
    },
    /// Unsubscription confirmed
    Unsubscribed {
        /// Topics successfully unsubscribed from
        topics: Vec<String>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to
    pub topic: String,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    /// Create a window event from a displayed frame
    pub fn window(frame: &WindowFrame) -> Self {
        Self {
            topic: WINDOW_TOPIC.to_string(),
            message: ServerMessage::Window {
                frame: frame.clone(),
            },
        }
    }

    /// Create a system notice event
    pub fn system(message: &str) -> Self {
        Self {
            topic: SYSTEM_TOPIC.to_string(),
            message: ServerMessage::Notice {
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["window", "system"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics.len(), 2);
                assert_eq!(topics[0], "window");
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_window() {
        let msg = ServerMessage::Window {
            frame: WindowFrame::empty(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"window\""));
        assert!(json.contains("\"state\":\"empty\""));
        assert!(json.contains("Be the first to join the fun!"));
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }

    #[test]
    fn test_ws_event_topics() {
        assert_eq!(WsEvent::window(&WindowFrame::empty()).topic, "window");
        let event = WsEvent::system("kickoff in one hour");
        assert_eq!(event.topic, "system");
        assert!(matches!(event.message, ServerMessage::Notice { .. }));
    }
}

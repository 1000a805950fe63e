//! WebSocket Connection Hub
//!
//! Manages all WebSocket connections, subscriptions, and message broadcasting.
//! The hub is also a `WindowSink`: every frame the presenter displays is
//! pushed to connections subscribed to the `window` topic.
//!
//! Delivery is synchronous: a published message is queued on every
//! subscriber's channel before `publish` returns, so each connection sees
//! messages in publish order.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::{ServerMessage, WsEvent, SYSTEM_TOPIC, WINDOW_TOPIC};
use crate::presenter::{WindowFrame, WindowSink};

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    /// Connections and topic subscriptions; never held across an await
    state: RwLock<HubState>,
    /// Configuration
    config: HubConfig,
}

#[derive(Default)]
struct HubState {
    /// Active connections: ConnectionId → ConnectionHandle
    connections: HashMap<ConnectionId, ConnectionHandle>,
    /// Topic subscriptions: Topic → Set of ConnectionIds
    subscriptions: HashMap<String, HashSet<ConnectionId>>,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    /// Channel sender for this connection
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    /// Topics this connection is subscribed to
    pub subscriptions: HashSet<String>,
}

impl ConnectionHub {
    /// Create a new connection hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            state: RwLock::new(HubState::default()),
            config,
        }
    }

    /// Register a new WebSocket connection
    ///
    /// Returns the connection ID on success, or an error if the connection
    /// limit has been reached.
    pub fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut state = self.state.write();
        if state.connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        state.connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                subscriptions: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and clean up its subscriptions
    pub fn unregister(&self, id: &str) {
        let mut state = self.state.write();

        if let Some(handle) = state.connections.remove(id) {
            for topic in handle.subscriptions {
                if let Some(subscribers) = state.subscriptions.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        state.subscriptions.remove(&topic);
                    }
                }
            }
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics
    pub fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut state = self.state.write();
        let HubState {
            connections,
            subscriptions,
        } = &mut *state;

        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let mut subscribed = Vec::new();
        for topic in topics {
            if !Self::is_valid_topic(&topic) {
                tracing::warn!(topic = %topic, "Invalid topic ignored");
                continue;
            }

            handle.subscriptions.insert(topic.clone());
            subscriptions
                .entry(topic.clone())
                .or_default()
                .insert(id.to_string());

            subscribed.push(topic);
        }

        tracing::debug!(
            connection_id = %id,
            topics = ?subscribed,
            "Subscribed to topics"
        );

        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics
    pub fn unsubscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut state = self.state.write();
        let HubState {
            connections,
            subscriptions,
        } = &mut *state;

        let handle = connections
            .get_mut(id)
            .ok_or(HubError::ConnectionNotFound)?;

        let mut unsubscribed = Vec::new();
        for topic in topics {
            if handle.subscriptions.remove(&topic) {
                if let Some(subscribers) = subscriptions.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subscriptions.remove(&topic);
                    }
                }
                unsubscribed.push(topic);
            }
        }

        tracing::debug!(
            connection_id = %id,
            topics = ?unsubscribed,
            "Unsubscribed from topics"
        );

        Ok(unsubscribed)
    }

    /// Queue an event on every subscriber of its topic
    ///
    /// Returns the number of connections it was queued on.
    pub fn publish(&self, event: WsEvent) -> usize {
        let state = self.state.read();

        let Some(subscriber_ids) = state.subscriptions.get(&event.topic) else {
            return 0;
        };

        let mut sent_count = 0;
        for id in subscriber_ids {
            if let Some(handle) = state.connections.get(id) {
                if handle.sender.send(event.message.clone()).is_ok() {
                    sent_count += 1;
                }
            }
        }

        if sent_count > 0 {
            tracing::trace!(
                topic = %event.topic,
                subscribers = sent_count,
                "Broadcast event"
            );
        }
        sent_count
    }

    /// Send a message directly to a specific connection
    pub fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let state = self.state.read();
        let handle = state
            .connections
            .get(id)
            .ok_or(HubError::ConnectionNotFound)?;

        handle
            .sender
            .send(message)
            .map_err(|_| HubError::SendFailed)
    }

    /// Check if a topic is valid
    pub fn is_valid_topic(topic: &str) -> bool {
        topic == WINDOW_TOPIC || topic == SYSTEM_TOPIC
    }

    /// Get the current connection count
    pub fn connection_count(&self) -> usize {
        self.state.read().connections.len()
    }

    /// Get subscription count for a topic
    pub fn subscription_count(&self, topic: &str) -> usize {
        self.state
            .read()
            .subscriptions
            .get(topic)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

impl WindowSink for ConnectionHub {
    fn display(&self, frame: &WindowFrame) {
        self.publish(WsEvent::window(frame));
    }
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

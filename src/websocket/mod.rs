//! WebSocket Real-Time Streaming
//!
//! Pushes the attendee window to display pages as it rotates.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages all active connections and subscriptions, and
//!   is itself a `WindowSink` fed by the presenter
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/ws` and can subscribe to topics:
//! - `window` - Every displayed attendee window; the current one is sent
//!   right after subscribing
//! - `system` - Server notices
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8026/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['window']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'window') render(msg.frame);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, WsEvent, SYSTEM_TOPIC, WINDOW_TOPIC};

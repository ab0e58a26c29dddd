//! Dropdown Push Channel
//!
//! Pushes dropdown-option updates to dashboard clients over WebSocket.
//!
//! ## Architecture
//!
//! - **DropdownHub**: Tracks active connections and broadcasts to them
//! - **Notifier**: Fetches the store and publishes the identifier list,
//!   shared by the `connect` and `refresh-data` triggers
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Client and server wire formats
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8050/api/v1/ws');
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'update-dropdown') {
//!     console.log('Identifiers:', msg.identifiers);
//!   }
//! };
//!
//! // Ask for a fresh list
//! ws.send(JSON.stringify({type: 'refresh-data'}));
//! ```

mod handler;
mod hub;
mod messages;
mod notifier;

pub use handler::websocket_handler;
pub use hub::{ConnectionId, DropdownHub, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage};
pub use notifier::{distinct_identifiers, publish_identifiers, NotifyTrigger};

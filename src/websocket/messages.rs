//! Push Channel Message Types
//!
//! Wire messages for the dropdown push channel between dashboard clients
//! and the server. Event names use kebab-case on the wire
//! (`refresh-data`, `update-dropdown`).

use serde::{Deserialize, Serialize};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Ask the server to re-read the store and re-send the identifier list
    RefreshData,
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Current distinct identifier set for the dropdown
    UpdateDropdown {
        /// Identifier strings, sorted for a stable dropdown
        identifiers: Vec<String>,
    },
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_refresh() {
        let json = r#"{"type": "refresh-data"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::RefreshData));
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_client_message_rejects_unknown_type() {
        let json = r#"{"type": "drop-tables"}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_server_message_serialize_update_dropdown() {
        let msg = ServerMessage::UpdateDropdown {
            identifiers: vec!["A".to_string(), "B".to_string()],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"update-dropdown\""));
        assert!(json.contains("\"identifiers\":[\"A\",\"B\"]"));
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
}

//! Push Channel Handler
//!
//! Handles WebSocket upgrade requests and manages the connection
//! lifecycle. A fresh connection immediately receives the current
//! identifier list; a refresh-data message re-sends it.

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

use crate::api::AppState;
use crate::store::MeasurementSource;

use super::hub::DropdownHub;
use super::messages::{ClientMessage, ServerMessage};
use super::notifier::{publish_identifiers, NotifyTrigger};

/// WebSocket upgrade handler for `GET /api/v1/ws`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.hub);
    let source = Arc::clone(&state.source);
    ws.on_upgrade(move |socket| handle_socket(socket, hub, source))
}

/// Handle an established push-channel connection
async fn handle_socket(
    socket: WebSocket,
    hub: Arc<DropdownHub>,
    source: Arc<dyn MeasurementSource>,
) {
    let (mut sender, mut receiver) = socket.split();

    // Channel for messages addressed to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let connection_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register push channel connection");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Ok(text) = serde_json::to_string(&error_msg) {
                let _ = sender.send(Message::Text(text)).await;
            }
            return;
        }
    };

    let connected_msg = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    let connected_text = match serde_json::to_string(&connected_msg) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize connected message");
            hub.unregister(&connection_id).await;
            return;
        }
    };
    if sender.send(Message::Text(connected_text)).await.is_err() {
        tracing::error!(connection_id = %connection_id, "Failed to send connected message");
        hub.unregister(&connection_id).await;
        return;
    }

    // connect trigger: send the current identifier list right away
    if let Err(e) =
        publish_identifiers(&source, &hub, NotifyTrigger::Connect, &connection_id).await
    {
        tracing::warn!(
            connection_id = %connection_id,
            error = %e,
            "Initial dropdown publish failed"
        );
    }

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(
                            connection_id = %conn_id_for_send,
                            "Push channel send failed, closing connection"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                }
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let source_for_recv = Arc::clone(&source);
    let conn_id_for_recv = connection_id.clone();

    // Task to receive messages from WebSocket and handle them
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &source_for_recv, &conn_id_for_recv, msg)
                        .await
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "Push channel receive error"
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

    hub.unregister(&connection_id).await;
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &Arc<DropdownHub>,
    source: &Arc<dyn MeasurementSource>,
    connection_id: &str,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(hub, source, connection_id, client_msg).await;
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    // Send error but keep connection open
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(connection_id, error_msg).await;
                }
            }
            true
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(connection_id, error_msg).await;
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
async fn handle_client_message(
    hub: &Arc<DropdownHub>,
    source: &Arc<dyn MeasurementSource>,
    connection_id: &str,
    message: ClientMessage,
) {
    match message {
        ClientMessage::RefreshData => {
            // Errors are already reported on the channel by the notifier
            let _ = publish_identifiers(source, hub, NotifyTrigger::Refresh, connection_id).await;
        }
        ClientMessage::Ping => {
            let _ = hub.send_to(connection_id, ServerMessage::Pong).await;
        }
    }
}

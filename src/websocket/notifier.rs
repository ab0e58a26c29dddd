//! Dropdown Notifier
//!
//! Computes the distinct identifier set from a fresh store fetch and
//! publishes it over the push channel. One handler serves both trigger
//! sources; repeated triggers simply re-send the (possibly updated) list.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::store::{MeasurementRow, MeasurementSource, StoreError};

use super::hub::DropdownHub;
use super::messages::ServerMessage;

/// Why the notifier is being invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyTrigger {
    /// A client just connected to the push channel
    Connect,
    /// A client sent an explicit refresh-data request
    Refresh,
}

/// Compute the distinct identifier set from fetched rows
///
/// The set is order-insignificant; it is returned sorted so the dropdown
/// is stable across refreshes.
pub fn distinct_identifiers(rows: &[MeasurementRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.identifier.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Fetch the store and broadcast the identifier list
///
/// On fetch failure the error is sent to the triggering connection and
/// propagated; no stale or empty list is emitted in its place.
pub async fn publish_identifiers(
    source: &Arc<dyn MeasurementSource>,
    hub: &Arc<DropdownHub>,
    trigger: NotifyTrigger,
    connection_id: &str,
) -> Result<(), StoreError> {
    let rows = match source.fetch_daily_averages().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(
                connection_id = %connection_id,
                trigger = ?trigger,
                error = %e,
                "Dropdown refresh failed"
            );
            let _ = hub
                .send_to(
                    connection_id,
                    ServerMessage::Error {
                        message: e.to_string(),
                    },
                )
                .await;
            return Err(e);
        }
    };

    let identifiers = distinct_identifiers(&rows);
    tracing::debug!(
        trigger = ?trigger,
        identifier_count = identifiers.len(),
        "Publishing dropdown update"
    );

    // The payload derives from global store state, so a broadcast keeps
    // every connected dropdown current, not just the triggering one.
    hub.broadcast(ServerMessage::UpdateDropdown { identifiers }).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{row, StaticSource, UnreachableSource};
    use crate::websocket::hub::HubConfig;
    use tokio::sync::mpsc;

    async fn hub_with_connection() -> (
        Arc<DropdownHub>,
        String,
        mpsc::UnboundedReceiver<ServerMessage>,
    ) {
        let hub = Arc::new(DropdownHub::new(HubConfig::default()));
        let (tx, rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        (hub, id, rx)
    }

    #[test]
    fn test_distinct_identifiers_dedupes_and_sorts() {
        let rows = vec![
            row("B", "2024-01-01", 5.0),
            row("A", "2024-01-01", 10.0),
            row("A", "2024-01-02", 12.0),
        ];
        assert_eq!(distinct_identifiers(&rows), vec!["A", "B"]);
    }

    #[test]
    fn test_distinct_identifiers_empty() {
        assert!(distinct_identifiers(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_publish_broadcasts_identifier_list() {
        let source: Arc<dyn MeasurementSource> = Arc::new(StaticSource::new(vec![
            row("A", "2024-01-01", 10.0),
            row("B", "2024-01-01", 5.0),
        ]));
        let (hub, id, mut rx) = hub_with_connection().await;

        publish_identifiers(&source, &hub, NotifyTrigger::Connect, &id)
            .await
            .unwrap();

        match rx.try_recv().unwrap() {
            ServerMessage::UpdateDropdown { identifiers } => {
                assert_eq!(identifiers, vec!["A", "B"]);
            }
            other => panic!("Expected UpdateDropdown, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repeated_triggers_emit_same_set() {
        let source: Arc<dyn MeasurementSource> =
            Arc::new(StaticSource::new(vec![row("A", "2024-01-01", 10.0)]));
        let (hub, id, mut rx) = hub_with_connection().await;

        publish_identifiers(&source, &hub, NotifyTrigger::Connect, &id)
            .await
            .unwrap();
        publish_identifiers(&source, &hub, NotifyTrigger::Refresh, &id)
            .await
            .unwrap();

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        match (first, second) {
            (
                ServerMessage::UpdateDropdown { identifiers: a },
                ServerMessage::UpdateDropdown { identifiers: b },
            ) => assert_eq!(a, b),
            other => panic!("Expected two UpdateDropdown messages, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_store_emits_empty_list() {
        let source: Arc<dyn MeasurementSource> = Arc::new(StaticSource::new(vec![]));
        let (hub, id, mut rx) = hub_with_connection().await;

        publish_identifiers(&source, &hub, NotifyTrigger::Connect, &id)
            .await
            .unwrap();

        match rx.try_recv().unwrap() {
            ServerMessage::UpdateDropdown { identifiers } => assert!(identifiers.is_empty()),
            other => panic!("Expected UpdateDropdown, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_surfaces_error_not_stale_list() {
        let source: Arc<dyn MeasurementSource> = Arc::new(UnreachableSource);
        let (hub, id, mut rx) = hub_with_connection().await;

        let result = publish_identifiers(&source, &hub, NotifyTrigger::Refresh, &id).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));

        // The triggering client sees an error message, never a dropdown update
        match rx.try_recv().unwrap() {
            ServerMessage::Error { message } => assert!(message.contains("unreachable")),
            other => panic!("Expected Error, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}

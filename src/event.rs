use crate::{NodeKind, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A graph event with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl GraphEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }

    /// Create a new event with a specific timestamp
    pub fn with_timestamp(timestamp: DateTime<Utc>, event: EventType) -> Self {
        Self { timestamp, event }
    }
}

/// Everything that changes the graph, plus history bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventType {
    NodeAdded {
        id: String,
        kind: NodeKind,
        position: Position,
    },

    NodeDuplicated {
        original: String,
        id: String,
    },

    NodeUpdated {
        id: String,
    },

    NodeMoved {
        id: String,
        position: Position,
    },

    NodeResized {
        id: String,
        width: f64,
        height: f64,
    },

    NodeDeleted {
        id: String,
        /// Edges left pointing at the deleted node
        orphaned_edges: Vec<String>,
    },

    EdgeConnected {
        id: String,
        source: String,
        target: String,
        source_handle: Option<String>,
    },

    EdgeDeleted {
        id: String,
    },

    Relayout {
        moved: usize,
    },

    SnapshotCreated {
        snapshot_id: Ulid,
        cursor: usize,
    },

    /// Graph replaced by a history entry (undo/redo)
    HistoryRestored {
        snapshot_id: Ulid,
        cursor: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = GraphEvent::new(EventType::NodeAdded {
            id: "action-2".to_string(),
            kind: NodeKind::Action,
            position: Position::new(100.0, 100.0),
        });

        assert!(event.timestamp <= Utc::now());
    }

    #[test]
    fn test_event_serialization() {
        let event = GraphEvent::new(EventType::EdgeConnected {
            id: "ea-b".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            source_handle: Some("yes".to_string()),
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: GraphEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.event, event.event);
        assert_eq!(deserialized.timestamp, event.timestamp);
    }
}

use crate::{EdgeId, NodeId, Position};

/// Gesture reported by the canvas renderer.
///
/// Position and dimension changes arrive once per frame while a drag or resize is in
/// progress (`dragging`/`resizing` set); the final change of the gesture clears the flag.
/// The editor collapses the whole gesture into one history entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasChange {
    Position {
        id: NodeId,
        position: Position,
        dragging: bool,
    },
    Dimensions {
        id: NodeId,
        width: f64,
        height: f64,
        resizing: bool,
    },
    Select { id: NodeId },
    Connect {
        source: NodeId,
        target: NodeId,
        source_handle: Option<String>,
    },
    RemoveNode { id: NodeId },
    RemoveEdge { id: EdgeId },
}

impl CanvasChange {
    /// Mid-gesture changes are recorded on a trailing debounce
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            CanvasChange::Position { dragging: true, .. }
                | CanvasChange::Dimensions { resizing: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_changes() {
        let drag = CanvasChange::Position {
            id: "action-1".to_string(),
            position: Position::new(1.0, 2.0),
            dragging: true,
        };
        let drop = CanvasChange::Position {
            id: "action-1".to_string(),
            position: Position::new(1.0, 2.0),
            dragging: false,
        };
        let connect = CanvasChange::Connect {
            source: "action-1".to_string(),
            target: "card-1".to_string(),
            source_handle: None,
        };

        assert!(drag.is_continuous());
        assert!(!drop.is_continuous());
        assert!(!connect.is_continuous());
    }
}

use crate::node::{HANDLE_NO, HANDLE_YES};
use crate::NodeId;
use serde::{Deserialize, Serialize};

pub type EdgeId = String;

/// Directed connection between two nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: EdgeId,

    /// Node the edge leaves from
    pub source: NodeId,

    /// Node the edge points to
    pub target: NodeId,

    /// Named outgoing handle on the source (`yes`/`no` for decisions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub animated: bool,

    #[serde(default)]
    pub marker: MarkerKind,
}

impl Edge {
    /// Create a new edge with an arrow marker
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            label: None,
            animated: false,
            marker: MarkerKind::Arrow,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Check if this edge touches a given node
    pub fn involves(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Check if this edge leaves from a given node
    pub fn starts_from(&self, node_id: &str) -> bool {
        self.source == node_id
    }

    /// Check if this edge points to a given node
    pub fn ends_at(&self, node_id: &str) -> bool {
        self.target == node_id
    }
}

/// Marker drawn at the target end
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    None,
    #[default]
    Arrow,
}

/// Default label for an edge leaving a named handle
pub fn handle_label(handle: &str) -> Option<String> {
    match handle {
        HANDLE_YES => Some("Yes".to_string()),
        HANDLE_NO => Some("No".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let edge = Edge::new("e1-2", "decision-1", "flag-1");

        assert_eq!(edge.source, "decision-1");
        assert_eq!(edge.target, "flag-1");
        assert_eq!(edge.marker, MarkerKind::Arrow);
        assert!(!edge.animated);
        assert!(edge.source_handle.is_none());
    }

    #[test]
    fn test_edge_involves() {
        let edge = Edge::new("e", "a", "b");

        assert!(edge.involves("a"));
        assert!(edge.involves("b"));
        assert!(!edge.involves("c"));
    }

    #[test]
    fn test_edge_direction() {
        let edge = Edge::new("e", "a", "b");

        assert!(edge.starts_from("a"));
        assert!(!edge.starts_from("b"));

        assert!(edge.ends_at("b"));
        assert!(!edge.ends_at("a"));
    }

    #[test]
    fn test_handle_label() {
        assert_eq!(handle_label("yes").as_deref(), Some("Yes"));
        assert_eq!(handle_label("no").as_deref(), Some("No"));
        assert_eq!(handle_label("other"), None);
    }
}

use crate::StyleAttributes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Node identifier, `"{kind}-{n}"` for nodes created by the editor
pub type NodeId = String;

/// A node placed on the canvas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier, never reused within a session
    pub id: NodeId,

    /// Node kind determines shape and handles
    pub kind: NodeKind,

    /// Top-left corner on the canvas (pixels)
    pub position: Position,

    /// Label, optional image and style overrides
    pub data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            data,
        }
    }

    /// Update the node's position
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Replace the node's data wholesale
    pub fn set_data(&mut self, data: NodeData) {
        self.data = data;
    }

    /// Style overrides, or an empty set when none were stored
    pub fn style(&self) -> StyleAttributes {
        self.data.style.clone().unwrap_or_default()
    }

    /// Check whether an edge may leave this node from `handle`
    pub fn accepts_source_handle(&self, handle: Option<&str>) -> bool {
        self.kind.source_handles().accepts(handle)
    }
}

/// Position on canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by a fixed offset
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Node kinds available in the palette
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Action,
    Decision,
    Success,
    Error,
    Flag,
    #[serde(rename = "qrcode")]
    QrCode,
    Card,
    Image,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Action,
        NodeKind::Decision,
        NodeKind::Success,
        NodeKind::Error,
        NodeKind::Flag,
        NodeKind::QrCode,
        NodeKind::Card,
        NodeKind::Image,
    ];

    /// Lowercase name used in ids
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Action => "action",
            NodeKind::Decision => "decision",
            NodeKind::Success => "success",
            NodeKind::Error => "error",
            NodeKind::Flag => "flag",
            NodeKind::QrCode => "qrcode",
            NodeKind::Card => "card",
            NodeKind::Image => "image",
        }
    }

    /// Kind name with the first letter uppercased, used in default labels
    pub fn capitalized(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Outgoing connection points exposed by this kind
    pub fn source_handles(&self) -> SourceHandles {
        match self {
            NodeKind::Decision => SourceHandles::Named(&[HANDLE_YES, HANDLE_NO]),
            NodeKind::Action | NodeKind::Flag | NodeKind::Image => SourceHandles::Single,
            // Terminal and display nodes
            NodeKind::Success | NodeKind::Error | NodeKind::Card | NodeKind::QrCode => {
                SourceHandles::None
            }
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_lowercase();
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| format!("Unknown node kind: {}", s))
    }
}

pub const HANDLE_YES: &str = "yes";
pub const HANDLE_NO: &str = "no";

/// Outgoing handle layout of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceHandles {
    /// No outgoing edges
    None,
    /// One unnamed outgoing handle
    Single,
    /// Named handles; edges must pick one
    Named(&'static [&'static str]),
}

impl SourceHandles {
    pub fn accepts(&self, handle: Option<&str>) -> bool {
        match (self, handle) {
            (SourceHandles::None, _) => false,
            (SourceHandles::Single, None) => true,
            (SourceHandles::Single, Some(_)) => false,
            (SourceHandles::Named(names), Some(h)) => names.contains(&h),
            (SourceHandles::Named(_), None) => false,
        }
    }
}

/// Payload carried by every node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeData {
    pub label: String,

    /// Image stored inline as a data URL (image nodes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleAttributes>,
}

impl NodeData {
    /// Data with just a label
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            image_url: None,
            style: None,
        }
    }

    /// Builder-style image URL
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder-style style overrides
    pub fn with_style(mut self, style: StyleAttributes) -> Self {
        self.style = Some(style);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(
            "action-1",
            NodeKind::Action,
            Position::new(10.0, 20.0),
            NodeData::labeled("Domestic"),
        );

        assert_eq!(node.id, "action-1");
        assert_eq!(node.kind, NodeKind::Action);
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert_eq!(node.data.label, "Domestic");
        assert!(node.data.style.is_none());
        assert_eq!(node.style(), StyleAttributes::default());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::QrCode.as_str(), "qrcode");
        assert_eq!(NodeKind::QrCode.capitalized(), "Qrcode");
        assert_eq!(NodeKind::Decision.capitalized(), "Decision");
        assert_eq!("FLAG".parse::<NodeKind>(), Ok(NodeKind::Flag));
        assert!("circle".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&NodeKind::QrCode).unwrap();
        assert_eq!(json, "\"qrcode\"");
        let kind: NodeKind = serde_json::from_str("\"decision\"").unwrap();
        assert_eq!(kind, NodeKind::Decision);
    }

    #[test]
    fn test_source_handles() {
        let decision = NodeKind::Decision.source_handles();
        assert!(decision.accepts(Some("yes")));
        assert!(decision.accepts(Some("no")));
        assert!(!decision.accepts(Some("maybe")));
        assert!(!decision.accepts(None));

        assert!(NodeKind::Action.source_handles().accepts(None));
        assert!(!NodeKind::Action.source_handles().accepts(Some("yes")));

        for terminal in [
            NodeKind::Success,
            NodeKind::Error,
            NodeKind::Card,
            NodeKind::QrCode,
        ] {
            assert!(!terminal.source_handles().accepts(None));
        }
    }

    #[test]
    fn test_position_offset() {
        let p = Position::new(100.0, 100.0).offset(50.0, 50.0);
        assert_eq!(p, Position::new(150.0, 150.0));
    }
}

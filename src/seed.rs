use crate::id_generator::TypeCounter;
use crate::{Edge, GraphStore, Node, NodeData, NodeKind, Position};

/// The payment-routing flow every new session opens with
pub fn initial_store() -> GraphStore {
    GraphStore::from_parts(initial_nodes(), initial_edges(), initial_counter())
}

pub fn initial_nodes() -> Vec<Node> {
    let node = |id: &str, kind, x, y, label: &str| {
        Node::new(id, kind, Position::new(x, y), NodeData::labeled(label))
    };

    vec![
        node("decision-1", NodeKind::Decision, 300.0, 50.0, "Is Valid Country?"),
        node("flag-1", NodeKind::Flag, 150.0, 150.0, "International"),
        node("action-1", NodeKind::Action, 450.0, 150.0, "Domestic"),
        node("decision-2", NodeKind::Decision, 450.0, 250.0, "Shows QR code?"),
        node("qrcode-1", NodeKind::QrCode, 350.0, 350.0, "QR Payment"),
        node("card-1", NodeKind::Card, 550.0, 350.0, "Pay Cards"),
    ]
}

pub fn initial_edges() -> Vec<Edge> {
    vec![
        Edge::new("e1-2", "decision-1", "flag-1")
            .with_handle("yes")
            .with_label("Yes")
            .animated(true),
        Edge::new("e1-3", "decision-1", "action-1")
            .with_handle("no")
            .with_label("No"),
        Edge::new("e3-4", "action-1", "decision-2"),
        Edge::new("e4-5", "decision-2", "qrcode-1")
            .with_handle("yes")
            .with_label("Yes"),
        Edge::new("e4-6", "decision-2", "card-1")
            .with_handle("no")
            .with_label("No"),
    ]
}

pub fn initial_counter() -> TypeCounter {
    TypeCounter::with_counts([
        (NodeKind::Action, 1),
        (NodeKind::Decision, 2),
        (NodeKind::Success, 0),
        (NodeKind::Error, 0),
        (NodeKind::Flag, 1),
        (NodeKind::QrCode, 1),
        (NodeKind::Card, 1),
        (NodeKind::Image, 0),
    ])
}

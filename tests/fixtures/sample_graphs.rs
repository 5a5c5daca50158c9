// Helper functions to build editing sessions with various flow shapes

#![allow(dead_code)]

use flow_editor::{Editor, EditorConfig, GraphStore, NodeData, NodeId, NodeKind, Position};

/// Session on an empty canvas
pub fn empty_editor() -> Editor {
    Editor::empty(EditorConfig::default())
}

/// Session on the default payment-routing flow
pub fn seeded_editor() -> Editor {
    Editor::new(EditorConfig::default())
}

/// Linear chain: action-1 → action-2 → ... → action-n
pub fn create_chain(len: usize) -> (Editor, Vec<NodeId>) {
    let mut editor = empty_editor();
    let mut ids: Vec<NodeId> = Vec::with_capacity(len);

    for i in 0..len {
        let id = editor.add_node(
            NodeKind::Action,
            Position::new(100.0, 100.0 + i as f64 * 120.0),
            NodeData::default(),
        );
        if let Some(prev) = ids.last() {
            editor.connect(prev, &id, None).unwrap();
        }
        ids.push(id);
    }

    (editor, ids)
}

/// One decision branching to a success and an error node
pub fn create_decision_branch() -> (Editor, NodeId, NodeId, NodeId) {
    let mut editor = empty_editor();

    let decision = editor.add_node(
        NodeKind::Decision,
        Position::new(200.0, 50.0),
        NodeData::labeled("Approved?"),
    );
    let yes = editor.add_node(
        NodeKind::Success,
        Position::new(100.0, 200.0),
        NodeData::labeled("Done"),
    );
    let no = editor.add_node(
        NodeKind::Error,
        Position::new(300.0, 200.0),
        NodeData::labeled("Rejected"),
    );
    editor.connect(&decision, &yes, Some("yes")).unwrap();
    editor.connect(&decision, &no, Some("no")).unwrap();

    (editor, decision, yes, no)
}

/// One node of every kind, unconnected
pub fn create_one_of_each() -> Editor {
    let mut editor = empty_editor();
    for (i, kind) in NodeKind::ALL.iter().enumerate() {
        editor.add_node(
            *kind,
            Position::new(i as f64 * 160.0, 0.0),
            NodeData::default(),
        );
    }
    editor
}

/// Positions of every node, sorted by id
pub fn positions(store: &GraphStore) -> Vec<(String, Position)> {
    let mut all: Vec<_> = store
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), n.position))
        .collect();
    all.sort_by(|a, b| a.0.cmp(&b.0));
    all
}

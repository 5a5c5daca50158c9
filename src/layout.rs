//! Grid auto-layout.
//!
//! Nodes are grouped by kind (groups ordered by first appearance) and each group is laid
//! out in a fixed-column grid below the previous one. Edges are not considered; this is a
//! tidy-up placement, not a topology-aware layout.

use crate::{Node, NodeId, NodeKind, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub columns: usize,
    pub origin_x: f64,
    pub origin_y: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
    /// Extra space between kind groups
    pub group_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            origin_x: 100.0,
            origin_y: 50.0,
            column_spacing: 180.0,
            row_spacing: 150.0,
            group_gap: 50.0,
        }
    }
}

/// Compute new positions for every node. Output order follows the kind groups.
pub fn auto_layout(nodes: &[Node], config: &LayoutConfig) -> Vec<(NodeId, Position)> {
    let columns = config.columns.max(1);

    let mut order: Vec<NodeKind> = Vec::new();
    let mut groups: HashMap<NodeKind, Vec<&Node>> = HashMap::new();
    for node in nodes {
        groups
            .entry(node.kind)
            .or_insert_with(|| {
                order.push(node.kind);
                Vec::new()
            })
            .push(node);
    }

    let mut positions = Vec::with_capacity(nodes.len());
    let mut row_base = config.origin_y;

    for kind in order {
        let group = &groups[&kind];

        for (i, node) in group.iter().enumerate() {
            let column = i % columns;
            let row = i / columns;
            let position = Position::new(
                config.origin_x + column as f64 * config.column_spacing,
                row_base + row as f64 * config.row_spacing,
            );
            positions.push((node.id.clone(), position));
        }

        let rows = group.len().div_ceil(columns);
        row_base += rows as f64 * config.row_spacing + config.group_gap;
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeData;
    use pretty_assertions::assert_eq;

    fn node(id: &str, kind: NodeKind) -> Node {
        Node::new(id, kind, Position::new(999.0, 999.0), NodeData::labeled(id))
    }

    fn lookup(positions: &[(NodeId, Position)], id: &str) -> Position {
        positions
            .iter()
            .find(|(n, _)| n == id)
            .map(|(_, p)| *p)
            .unwrap()
    }

    #[test]
    fn test_grid_within_group() {
        let nodes: Vec<Node> = (1..=4)
            .map(|i| node(&format!("action-{}", i), NodeKind::Action))
            .collect();

        let positions = auto_layout(&nodes, &LayoutConfig::default());

        assert_eq!(lookup(&positions, "action-1"), Position::new(100.0, 50.0));
        assert_eq!(lookup(&positions, "action-2"), Position::new(280.0, 50.0));
        assert_eq!(lookup(&positions, "action-3"), Position::new(460.0, 50.0));
        // i = 3 wraps to row 1, column 0
        assert_eq!(lookup(&positions, "action-4"), Position::new(100.0, 200.0));
    }

    #[test]
    fn test_groups_stack_in_first_seen_order() {
        let nodes = vec![
            node("action-1", NodeKind::Action),
            node("decision-1", NodeKind::Decision),
            node("action-2", NodeKind::Action),
            node("action-3", NodeKind::Action),
            node("decision-2", NodeKind::Decision),
            node("action-4", NodeKind::Action),
        ];

        let positions = auto_layout(&nodes, &LayoutConfig::default());

        let action_row_1 = lookup(&positions, "action-4").y;
        let first_decision = lookup(&positions, "decision-1");
        assert!(first_decision.y > action_row_1);
        // 50 + ceil(4/3) * 150 + 50
        assert_eq!(first_decision, Position::new(100.0, 400.0));
        assert_eq!(lookup(&positions, "decision-2"), Position::new(280.0, 400.0));
    }

    #[test]
    fn test_deterministic() {
        let nodes = vec![
            node("flag-1", NodeKind::Flag),
            node("card-1", NodeKind::Card),
            node("flag-2", NodeKind::Flag),
        ];

        let first = auto_layout(&nodes, &LayoutConfig::default());
        let second = auto_layout(&nodes, &LayoutConfig::default());
        assert_eq!(first, second);
        assert_eq!(first[0].0, "flag-1");
        assert_eq!(first[2].0, "card-1");
    }

    #[test]
    fn test_empty_graph() {
        assert!(auto_layout(&[], &LayoutConfig::default()).is_empty());
    }
}

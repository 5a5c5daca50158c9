use crate::edge::handle_label;
use crate::id_generator::{EdgeIdGenerator, TypeCounter};
use crate::{
    Edge, EdgeId, EditorError, EventType, GraphEvent, GraphSnapshot, Node, NodeData, NodeId,
    NodeKind, Position, Result, StyleAttributes,
};
use std::collections::HashMap;
use tracing::debug;

/// Canonical node/edge collections of one editing session.
///
/// Read access is public. Mutation is crate-private: the [`crate::Editor`] is the only
/// sanctioned caller, so every change is followed by a history snapshot.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Nodes in insertion order (auto-layout depends on it)
    nodes: Vec<Node>,

    /// Edges in insertion order
    edges: Vec<Edge>,

    /// Per-kind counter for id and label synthesis
    counter: TypeCounter,

    /// Edge ids handed out this session
    edge_ids: EdgeIdGenerator,

    /// Event log for history tracking
    events: Vec<GraphEvent>,
}

impl GraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from an existing graph. `counter` is raised to cover every node id
    /// already present so new ids cannot collide.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>, counter: TypeCounter) -> Self {
        let mut counter = counter;
        counter.absorb(&TypeCounter::from_existing_ids(
            nodes.iter().map(|n| n.id.as_str()),
        ));
        let edge_ids = EdgeIdGenerator::from_existing_ids(edges.iter().map(|e| e.id.as_str()));

        Self {
            nodes,
            edges,
            counter,
            edge_ids,
            events: Vec::new(),
        }
    }

    // ========== Node Operations ==========

    /// Add a node; id and default label come from the per-kind counter
    pub(crate) fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        initial_data: NodeData,
    ) -> NodeId {
        let (n, id) = self.mint_node_id(kind);

        let mut data = initial_data;
        if data.label.is_empty() {
            data.label = format!("{} {}", kind.capitalized(), n);
        }

        debug!(%id, %kind, "node added");
        self.log_event(EventType::NodeAdded {
            id: id.clone(),
            kind,
            position,
        });

        self.nodes.push(Node::new(id.clone(), kind, position, data));
        id
    }

    /// Next counter value whose id is not taken by a node in the graph
    fn mint_node_id(&mut self, kind: NodeKind) -> (u32, NodeId) {
        loop {
            let n = self.counter.next(kind);
            let id = TypeCounter::node_id(kind, n);
            if !self.contains_node(&id) {
                return (n, id);
            }
        }
    }

    /// Get a node by ID
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EditorError::node_not_found(id))
    }

    /// Check if a node exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.get_node(id).is_some()
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Replace a node's data wholesale (no merge)
    pub(crate) fn update_node(&mut self, id: &str, data: NodeData) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_data(data);

        debug!(%id, "node updated");
        self.log_event(EventType::NodeUpdated { id: id.to_string() });

        Ok(())
    }

    /// Merge a partial style into the node's current style
    pub(crate) fn patch_style(&mut self, id: &str, patch: &StyleAttributes) -> Result<()> {
        let node = self.get_node(id).ok_or_else(|| EditorError::node_not_found(id))?;

        let mut data = node.data.clone();
        data.style = Some(node.style().merged(patch));

        self.update_node(id, data)
    }

    /// Move a single node
    pub(crate) fn move_node(&mut self, id: &str, position: Position) -> Result<()> {
        let node = self.node_mut(id)?;
        node.set_position(position);

        self.log_event(EventType::NodeMoved {
            id: id.to_string(),
            position,
        });

        Ok(())
    }

    /// Store new dimensions reported by the canvas as style width/height
    pub(crate) fn resize_node(&mut self, id: &str, width: f64, height: f64) -> Result<()> {
        let node = self.node_mut(id)?;
        let mut style = node.style();
        style.width = Some(width);
        style.height = Some(height);
        node.data.style = Some(style);

        self.log_event(EventType::NodeResized {
            id: id.to_string(),
            width,
            height,
        });

        Ok(())
    }

    /// Delete a node. Incident edges are kept and become dangling; their ids are returned.
    pub(crate) fn delete_node(&mut self, id: &str) -> Result<Vec<EdgeId>> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| EditorError::node_not_found(id))?;
        self.nodes.remove(index);

        let orphaned_edges: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|e| e.involves(id))
            .map(|e| e.id.clone())
            .collect();

        debug!(%id, orphaned = orphaned_edges.len(), "node deleted");
        self.log_event(EventType::NodeDeleted {
            id: id.to_string(),
            orphaned_edges: orphaned_edges.clone(),
        });

        Ok(orphaned_edges)
    }

    /// Copy a node's kind and data to a new node at `position + offset`
    pub(crate) fn duplicate_node(&mut self, id: &str, offset: (f64, f64)) -> Result<NodeId> {
        let original = self
            .get_node(id)
            .ok_or_else(|| EditorError::node_not_found(id))?
            .clone();

        let (_, new_id) = self.mint_node_id(original.kind);
        let position = original.position.offset(offset.0, offset.1);

        self.log_event(EventType::NodeDuplicated {
            original: original.id.clone(),
            id: new_id.clone(),
        });

        self.nodes
            .push(Node::new(new_id.clone(), original.kind, position, original.data));
        Ok(new_id)
    }

    /// Replace positions in bulk; ids that are not in the graph are skipped
    pub(crate) fn relayout(&mut self, positions: &HashMap<NodeId, Position>) -> usize {
        let mut moved = 0;
        for node in &mut self.nodes {
            if let Some(position) = positions.get(&node.id) {
                node.set_position(*position);
                moved += 1;
            }
        }

        self.log_event(EventType::Relayout { moved });
        moved
    }

    // ========== Edge Operations ==========

    /// Connect two existing nodes with a default arrow edge
    pub(crate) fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Result<EdgeId> {
        if !self.contains_node(source) {
            return Err(EditorError::node_not_found(source));
        }
        if !self.contains_node(target) {
            return Err(EditorError::node_not_found(target));
        }

        let id = self.edge_ids.next(source, source_handle, target);
        let mut edge = Edge::new(id.clone(), source, target);
        if let Some(handle) = source_handle {
            edge.label = handle_label(handle);
            edge.source_handle = Some(handle.to_string());
        }

        debug!(%id, source, target, "edge connected");
        self.log_event(EventType::EdgeConnected {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
        });

        self.edges.push(edge);
        Ok(id)
    }

    /// Get an edge by ID
    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Get all edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Delete an edge
    pub(crate) fn delete_edge(&mut self, id: &str) -> Result<()> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EditorError::edge_not_found(id))?;
        self.edges.remove(index);

        self.log_event(EventType::EdgeDeleted { id: id.to_string() });

        Ok(())
    }

    /// Get all edges leaving a node
    pub fn outgoing_edges(&self, source: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.starts_from(source)).collect()
    }

    /// Get all edges pointing to a node
    pub fn incoming_edges(&self, target: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.ends_at(target)).collect()
    }

    /// Edges whose source or target is no longer in the graph
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains_node(&e.source) || !self.contains_node(&e.target))
            .collect()
    }

    /// Edges the renderer can draw (both endpoints resolve)
    pub fn drawable_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| self.contains_node(&e.source) && self.contains_node(&e.target))
    }

    // ========== Snapshots ==========

    /// Deep copy of the current graph
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.nodes.clone(), self.edges.clone())
    }

    /// Replace the graph with a snapshot. Counters are left alone so ids stay unique.
    pub(crate) fn restore(&mut self, snapshot: &GraphSnapshot) {
        self.nodes = snapshot.nodes().to_vec();
        self.edges = snapshot.edges().to_vec();
        for edge in &self.edges {
            self.edge_ids.reserve(&edge.id);
        }
    }

    // ========== Event Logging ==========

    pub(crate) fn log_event(&mut self, event: EventType) {
        self.events.push(GraphEvent::new(event));
    }

    /// Get all events
    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    /// Clear event log
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    // ========== Utility Methods ==========

    /// Per-kind counters
    pub fn counter(&self) -> &TypeCounter {
        &self.counter
    }

    /// Count nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Count edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

use crate::{Edge, EditorError, Node, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Immutable copy of the whole graph at one point in time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// One entry in the undo stack
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Ulid,
    pub taken_at: DateTime<Utc>,
    pub snapshot: GraphSnapshot,
}

/// Linear undo/redo over graph snapshots.
///
/// `snapshots[cursor]` is the state currently shown. Recording after an undo drops the
/// entries past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    /// Oldest entries are dropped beyond this many
    limit: Option<usize>,
}

impl History {
    /// Start a history whose first entry is `initial`
    pub fn new(initial: GraphSnapshot) -> Self {
        Self::with_limit(initial, None)
    }

    pub fn with_limit(initial: GraphSnapshot, limit: Option<usize>) -> Self {
        Self {
            entries: vec![Self::entry(initial)],
            cursor: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    fn entry(snapshot: GraphSnapshot) -> HistoryEntry {
        HistoryEntry {
            id: Ulid::new(),
            taken_at: Utc::now(),
            snapshot,
        }
    }

    /// Record a snapshot after the cursor. Returns the new entry's id, or `None` when the
    /// snapshot equals the current one and nothing was recorded.
    pub fn record(&mut self, snapshot: GraphSnapshot) -> Option<Ulid> {
        if self.current().snapshot == snapshot {
            return None;
        }

        self.entries.truncate(self.cursor + 1);
        let entry = Self::entry(snapshot);
        let id = entry.id;
        self.entries.push(entry);

        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }

        self.cursor = self.entries.len() - 1;
        Some(id)
    }

    /// Step back one entry
    pub fn undo(&mut self) -> Result<&HistoryEntry> {
        if self.cursor == 0 {
            return Err(EditorError::NoOpUndo);
        }
        self.cursor -= 1;
        Ok(&self.entries[self.cursor])
    }

    /// Step forward one entry
    pub fn redo(&mut self) -> Result<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return Err(EditorError::NoOpRedo);
        }
        self.cursor += 1;
        Ok(&self.entries[self.cursor])
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

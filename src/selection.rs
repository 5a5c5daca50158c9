use crate::NodeId;

/// Selection state: nothing, or exactly one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(NodeId),
}

/// Tracks the node whose settings panel is open.
///
/// Clicking the canvas background does not deselect; only `close` or deleting the node does.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node clicked: select it, replacing any previous selection
    pub fn select(&mut self, id: impl Into<NodeId>) {
        self.state = SelectionState::Selected(id.into());
    }

    /// Explicit close of the settings panel
    pub fn close(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// A node left the graph; returns true if it was the selected one
    pub fn node_removed(&mut self, id: &str) -> bool {
        if self.is_selected(id) {
            self.state = SelectionState::Idle;
            true
        } else {
            false
        }
    }

    /// Drop the selection if `exists` no longer finds the node (after undo/redo)
    pub fn retain(&mut self, exists: impl Fn(&str) -> bool) -> bool {
        match &self.state {
            SelectionState::Selected(id) if !exists(id) => {
                self.state = SelectionState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Selected(id) => Some(id.as_str()),
            SelectionState::Idle => None,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected() == Some(id)
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }
}

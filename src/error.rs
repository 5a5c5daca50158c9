use thiserror::Error;

/// Errors raised by the editor engine.
///
/// `NotFound` signals a caller bug (a stale id reached the mutation API). The remaining
/// variants are user-triggerable and are turned into notices at the session boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("edge {edge} references missing node {missing}")]
    DanglingReference { edge: String, missing: String },

    #[error("Failed to download flowchart: {0}")]
    ExportFailure(String),

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Nothing to undo")]
    NoOpUndo,

    #[error("Nothing to redo")]
    NoOpRedo,

    #[error("No node selected")]
    NoSelection,

    #[error("{edit} cannot be applied to a {kind} node")]
    UnsupportedEdit { edit: &'static str, kind: String },

    #[error("Invalid color value: {0}")]
    InvalidColor(String),
}

impl EditorError {
    pub fn node_not_found(id: impl Into<String>) -> Self {
        EditorError::NotFound {
            what: "Node",
            id: id.into(),
        }
    }

    pub fn edge_not_found(id: impl Into<String>) -> Self {
        EditorError::NotFound {
            what: "Edge",
            id: id.into(),
        }
    }

    /// True for conditions the user can trigger from the UI.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            EditorError::NotFound { .. } | EditorError::DanglingReference { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;

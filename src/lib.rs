// Flow Editor - Core Library

pub mod change;
pub mod config;
pub mod debounce;
pub mod document;
pub mod edge;
pub mod editor;
pub mod error;
pub mod event;
pub mod export;
pub mod graph;
pub mod history;
pub mod id_generator;
pub mod image;
pub mod keyboard;
pub mod layout;
pub mod node;
pub mod notice;
pub mod seed;
pub mod selection;
pub mod style;
pub mod style_editor;
pub mod validation;

// Re-export main types for convenience
pub use change::CanvasChange;
pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use document::FlowDocument;
pub use edge::{Edge, EdgeId, MarkerKind};
pub use editor::Editor;
pub use error::{EditorError, Result};
pub use event::{EventType, GraphEvent};
pub use export::{
    ArtifactSink, DirectorySink, ExportJob, ExportPipeline, ExportSettings, Rasterizer, Surface,
    SurfaceElement,
};
pub use graph::GraphStore;
pub use history::{GraphSnapshot, History, HistoryEntry};
pub use keyboard::{Command, Key, KeyChord};
pub use layout::{auto_layout, LayoutConfig};
pub use node::{Node, NodeData, NodeId, NodeKind, Position};
pub use notice::{Notice, NoticeLevel};
pub use selection::{SelectionController, SelectionState};
pub use style::{BorderStyle, ResolvedStyle, StyleAttributes};
pub use style_editor::{StyleEdit, StylePanel, PALETTE};
pub use validation::{ValidatedGraph, ValidationIssue, ValidationResult, ValidationSeverity};

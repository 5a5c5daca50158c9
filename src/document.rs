use crate::id_generator::TypeCounter;
use crate::{Edge, GraphStore, Node};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const DOCUMENT_VERSION: &str = "0.1.0";

/// Flow saved to local disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDocument {
    pub version: String,
    pub saved_at: DateTime<Utc>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Per-kind counters, so reopened flows keep minting fresh ids
    #[serde(default)]
    pub counters: TypeCounter,
}

impl FlowDocument {
    /// Capture the current state of a store
    pub fn from_store(store: &GraphStore) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            saved_at: Utc::now(),
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
            counters: store.counter().clone(),
        }
    }

    /// Build a store from this document
    pub fn into_store(self) -> GraphStore {
        GraphStore::from_parts(self.nodes, self.edges, self.counters)
    }

    /// Save document to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create flow file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write flow to: {}", path.display()))?;
        Ok(())
    }

    /// Load document from file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open flow file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let document: FlowDocument = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse flow from: {}", path.display()))?;

        if document.version != DOCUMENT_VERSION {
            return Err(anyhow!(
                "Unsupported flow version {} in {}",
                document.version,
                path.display()
            ));
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::initial_store;
    use crate::{NodeData, NodeKind, Position};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_keeps_counters() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flow.json");

        let mut store = initial_store();
        let id = store.add_node(NodeKind::Action, Position::default(), NodeData::default());
        store.delete_node(&id).unwrap();

        FlowDocument::from_store(&store).save(&path).unwrap();
        let mut loaded = FlowDocument::load(&path).unwrap().into_store();

        assert_eq!(loaded.node_count(), store.node_count());
        assert_eq!(loaded.edges(), store.edges());
        // action-2 was deleted before saving, the next id must still move on
        let next = loaded.add_node(NodeKind::Action, Position::default(), NodeData::default());
        assert_eq!(next, "action-3");
    }

    #[test]
    fn test_missing_counters_rebuilt_from_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flow.json");
        fs::write(
            &path,
            r#"{
                "version": "0.1.0",
                "saved_at": "2024-01-01T00:00:00Z",
                "nodes": [
                    { "id": "card-7", "kind": "card", "position": { "x": 0.0, "y": 0.0 },
                      "data": { "label": "Pay" } }
                ],
                "edges": []
            }"#,
        )
        .unwrap();

        let mut store = FlowDocument::load(&path).unwrap().into_store();
        let next = store.add_node(NodeKind::Card, Position::default(), NodeData::default());
        assert_eq!(next, "card-8");
    }

    #[test]
    fn test_corrupted_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flow.json");
        fs::write(&path, "{ invalid json }").unwrap();

        assert!(FlowDocument::load(&path).is_err());
    }

    #[test]
    fn test_unsupported_version() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flow.json");
        fs::write(
            &path,
            r#"{
                "version": "9.9.9",
                "saved_at": "2024-01-01T00:00:00Z",
                "nodes": [],
                "edges": []
            }"#,
        )
        .unwrap();

        assert!(FlowDocument::load(&path).is_err());
    }
}

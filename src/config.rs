use crate::{ExportSettings, LayoutConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

/// Editor session settings. Every field has a default, so a config file may set any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period before a drag/resize gesture is recorded in history
    pub history_debounce_ms: u64,

    /// Maximum undo entries kept; unlimited when unset
    pub history_limit: Option<usize>,

    /// Offset applied to duplicated nodes
    pub duplicate_offset: (f64, f64),

    /// Quick-add places nodes at `origin + random * span`
    pub quick_add_origin: (f64, f64),
    pub quick_add_span: (f64, f64),

    /// Height/width ratio for locked resizing
    pub aspect_ratio: f64,

    pub layout: LayoutConfig,
    pub export: ExportSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_debounce_ms: 500,
            history_limit: None,
            duplicate_offset: (50.0, 50.0),
            quick_add_origin: (100.0, 100.0),
            quick_add_span: (300.0, 100.0),
            aspect_ratio: 0.7,
            layout: LayoutConfig::default(),
            export: ExportSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config from: {}", path.display()))
    }

    /// Save config to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write config to: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_debounce(), Duration::from_millis(500));
        assert_eq!(config.export.filename, "flowchart.png");
        assert_eq!(config.layout.columns, 3);
        assert_eq!(config.aspect_ratio, 0.7);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("editor.json");
        fs::write(&path, r#"{ "history_debounce_ms": 250, "layout": { "columns": 4 } }"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();

        assert_eq!(config.history_debounce_ms, 250);
        assert_eq!(config.layout.columns, 4);
        assert_eq!(config.layout.row_spacing, 150.0);
        assert_eq!(config.export.background, "#F7F9FB");
    }

    #[test]
    fn test_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("editor.json");

        let mut config = EditorConfig::default();
        config.history_limit = Some(100);
        config.save(&path).unwrap();

        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_corrupted_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("editor.json");
        fs::write(&path, "{ invalid json }").unwrap();

        assert!(EditorConfig::load(&path).is_err());
    }
}

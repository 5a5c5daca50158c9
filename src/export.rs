//! Export pipeline: captures the rendered canvas through a [`Rasterizer`], skipping
//! overlay elements, and saves the PNG through an [`ArtifactSink`].
//!
//! The capture runs on a worker thread; the event loop polls the returned [`ExportJob`].

use crate::image::DataUrl;
use crate::{EditorError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Element of the rendered surface, as seen by the capture filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceElement {
    pub tag: String,
    pub classes: Vec<String>,
    pub children: Vec<SurfaceElement>,
}

impl SurfaceElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_child(mut self, child: SurfaceElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Count this element and all descendants
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SurfaceElement::count).sum::<usize>()
    }

    /// Copy of the subtree without the elements `keep` rejects (and their children)
    pub fn filtered(&self, keep: &dyn Fn(&SurfaceElement) -> bool) -> Option<SurfaceElement> {
        if !keep(self) {
            return None;
        }
        Some(SurfaceElement {
            tag: self.tag.clone(),
            classes: self.classes.clone(),
            children: self
                .children
                .iter()
                .filter_map(|child| child.filtered(keep))
                .collect(),
        })
    }
}

/// Rendered canvas region handed over by the renderer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
    pub root: SurfaceElement,
}

/// Excludes overlay elements (control panels, attribution) from the capture.
///
/// An element is an overlay when one of its classes equals an excluded tag or ends with
/// `__{tag}` (`react-flow__panel` style names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayFilter {
    excluded: Vec<String>,
}

impl OverlayFilter {
    pub fn new(excluded: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn includes(&self, element: &SurfaceElement) -> bool {
        !element.classes.iter().any(|class| {
            self.excluded.iter().any(|tag| {
                class == tag
                    || class
                        .strip_suffix(tag.as_str())
                        .is_some_and(|prefix| prefix.ends_with("__"))
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub filename: String,
    pub background: String,
    pub quality: f64,
    pub excluded_overlays: Vec<String>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: "flowchart.png".to_string(),
            background: "#F7F9FB".to_string(),
            quality: 1.0,
            excluded_overlays: vec!["panel".to_string(), "attribution".to_string()],
        }
    }
}

/// Options passed to the rasterizer
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub background: String,
    pub quality: f64,
}

/// External rasterization utility: surface in, PNG data URL out
pub trait Rasterizer: Send + Sync {
    fn rasterize(
        &self,
        surface: &Surface,
        options: &RasterOptions,
        filter: &dyn Fn(&SurfaceElement) -> bool,
    ) -> anyhow::Result<String>;
}

/// Destination for the exported file
pub trait ArtifactSink: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> anyhow::Result<PathBuf>;
}

/// Saves artifacts into a local directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    /// Write to a temporary name first so a failed write never leaves a partial file
    fn save(&self, filename: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let target = self.dir.join(filename);
        let partial = self.dir.join(format!("{}.part", filename));

        fs::write(&partial, bytes)
            .with_context(|| format!("Failed to write export: {}", partial.display()))?;
        if let Err(e) = fs::rename(&partial, &target) {
            let _ = fs::remove_file(&partial);
            return Err(e).with_context(|| format!("Failed to save export: {}", target.display()));
        }

        Ok(target)
    }
}

/// Rasterize, decode and save
#[derive(Clone)]
pub struct ExportPipeline {
    rasterizer: Arc<dyn Rasterizer>,
    sink: Arc<dyn ArtifactSink>,
    settings: ExportSettings,
}

impl ExportPipeline {
    pub fn new(
        rasterizer: Arc<dyn Rasterizer>,
        sink: Arc<dyn ArtifactSink>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            rasterizer,
            sink,
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Run the whole export on the current thread
    pub fn run(&self, surface: &Surface) -> Result<PathBuf> {
        self.run_unless(surface, &AtomicBool::new(false))
    }

    /// Run the export, skipping the save if `cancelled` is set once the image is ready
    fn run_unless(&self, surface: &Surface, cancelled: &AtomicBool) -> Result<PathBuf> {
        let filter = OverlayFilter::new(self.settings.excluded_overlays.iter().cloned());
        let options = RasterOptions {
            background: self.settings.background.clone(),
            quality: self.settings.quality,
        };

        let image = self
            .rasterizer
            .rasterize(surface, &options, &|element| filter.includes(element))
            .context("Rasterization failed")
            .and_then(|url| DataUrl::parse(&url).context("Rasterizer returned no image"));

        if cancelled.load(Ordering::SeqCst) {
            info!("export cancelled before saving");
            return Err(EditorError::ExportFailure("export cancelled".to_string()));
        }

        match image.and_then(|image| self.sink.save(&self.settings.filename, &image.bytes)) {
            Ok(path) => {
                info!(path = %path.display(), "flowchart exported");
                Ok(path)
            }
            Err(e) => {
                error!("Error downloading image: {:#}", e);
                Err(EditorError::ExportFailure(format!("{:#}", e)))
            }
        }
    }

    /// Start the export on a worker thread
    pub fn spawn(&self, surface: Surface) -> ExportJob {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let pipeline = self.clone();
        let flag = Arc::clone(&cancelled);

        thread::spawn(move || {
            // Receiver may be gone if the session ended; nothing to clean up then
            let _ = tx.send(pipeline.run_unless(&surface, &flag));
        });

        ExportJob {
            receiver: rx,
            cancelled,
        }
    }
}

/// Handle to an export in flight. Dropping it abandons the result; [`ExportJob::cancel`]
/// also keeps the artifact from being written.
#[derive(Debug)]
pub struct ExportJob {
    receiver: Receiver<Result<PathBuf>>,
    cancelled: Arc<AtomicBool>,
}

impl ExportJob {
    /// Ask the worker to stop before saving. A save already under way still completes.
    pub fn cancel(self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Non-blocking check for the outcome
    pub fn poll(&self) -> Option<Result<PathBuf>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(EditorError::ExportFailure(
                "export worker stopped without a result".to_string(),
            ))),
        }
    }

    /// Block until the outcome arrives
    pub fn wait(self) -> Result<PathBuf> {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(EditorError::ExportFailure(
                "export worker stopped without a result".to_string(),
            ))
        })
    }
}

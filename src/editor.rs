use crate::image::read_image_as_data_url;
use crate::keyboard::{command_for, Command, KeyChord};
use crate::layout::auto_layout;
use crate::seed::initial_store;
use crate::style_editor::{plan_edit, StyleChange, StyleEdit, StylePanel};
use crate::{
    CanvasChange, Debouncer, EdgeId, EditorConfig, EditorError, EventType, ExportJob,
    ExportPipeline, FlowDocument, GraphSnapshot, GraphStore, History, Node, NodeData, NodeId,
    NodeKind, Notice, Position, Result, SelectionController, StyleAttributes, Surface,
};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use ulid::Ulid;

/// One editing session: the graph, its history, the selection and pending work.
///
/// Every mutation goes through here and is followed by a history snapshot. Commands
/// snapshot immediately; drags and resizes snapshot once the debounce settles (see
/// [`Editor::tick`]).
#[derive(Debug)]
pub struct Editor {
    store: GraphStore,
    history: History,
    selection: SelectionController,
    debouncer: Debouncer,
    config: EditorConfig,
    notices: Vec<Notice>,
    export_job: Option<ExportJob>,
}

impl Editor {
    /// Session opened on the default flow
    pub fn new(config: EditorConfig) -> Self {
        Self::from_store(initial_store(), config)
    }

    /// Session with an empty canvas
    pub fn empty(config: EditorConfig) -> Self {
        Self::from_store(GraphStore::new(), config)
    }

    /// Session on a previously saved flow
    pub fn open(document: FlowDocument, config: EditorConfig) -> Self {
        Self::from_store(document.into_store(), config)
    }

    pub fn from_store(store: GraphStore, config: EditorConfig) -> Self {
        let history = History::with_limit(store.snapshot(), config.history_limit);
        let debouncer = Debouncer::new(config.history_debounce());

        Self {
            store,
            history,
            selection: SelectionController::new(),
            debouncer,
            config,
            notices: Vec::new(),
            export_job: None,
        }
    }

    // ========== Read Access ==========

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection
            .selected()
            .and_then(|id| self.store.get_node(id))
    }

    /// Settings panel contents, shown only while a node is selected
    pub fn style_panel(&self) -> Option<StylePanel> {
        self.selected_node().map(StylePanel::for_node)
    }

    /// Capture the current flow for saving
    pub fn document(&self) -> FlowDocument {
        FlowDocument::from_store(&self.store)
    }

    // ========== Mutation API ==========

    pub fn add_node(&mut self, kind: NodeKind, position: Position, data: NodeData) -> NodeId {
        self.flush_pending();
        let id = self.store.add_node(kind, position, data);
        self.record();
        id
    }

    /// Replace a node's data wholesale
    pub fn update_node(&mut self, id: &str, data: NodeData) -> Result<()> {
        self.flush_pending();
        self.store.update_node(id, data)?;
        self.record();
        Ok(())
    }

    /// Merge a partial style into a node's style
    pub fn patch_style(&mut self, id: &str, patch: &StyleAttributes) -> Result<()> {
        self.flush_pending();
        self.store.patch_style(id, patch)?;
        self.record();
        Ok(())
    }

    /// Delete a node; incident edges stay behind as dangling edges
    pub fn delete_node(&mut self, id: &str) -> Result<Vec<EdgeId>> {
        self.flush_pending();
        let orphaned = self.store.delete_node(id)?;
        if self.selection.node_removed(id) {
            debug!(%id, "selection cleared by delete");
        }
        self.record();
        Ok(orphaned)
    }

    pub fn duplicate_node(&mut self, id: &str) -> Result<NodeId> {
        self.flush_pending();
        let new_id = self.store.duplicate_node(id, self.config.duplicate_offset)?;
        self.record();
        Ok(new_id)
    }

    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Result<EdgeId> {
        self.flush_pending();
        let id = self.store.connect(source, target, source_handle)?;
        self.record();
        Ok(id)
    }

    pub fn delete_edge(&mut self, id: &str) -> Result<()> {
        self.flush_pending();
        self.store.delete_edge(id)?;
        self.record();
        Ok(())
    }

    /// Bulk position replacement
    pub fn relayout(&mut self, positions: &HashMap<NodeId, Position>) -> usize {
        self.flush_pending();
        let moved = self.store.relayout(positions);
        self.record();
        moved
    }

    /// Rearrange every node with the grid layout
    pub fn auto_layout(&mut self) -> usize {
        let positions: HashMap<NodeId, Position> =
            auto_layout(self.store.nodes(), &self.config.layout)
                .into_iter()
                .collect();
        let moved = self.relayout(&positions);
        info!(moved, "auto layout applied");
        moved
    }

    /// Drag step; recorded once the gesture goes quiet
    pub fn move_node(&mut self, id: &str, position: Position, now: Instant) -> Result<()> {
        self.store.move_node(id, position)?;
        self.debouncer.schedule(now);
        Ok(())
    }

    /// Resize step; recorded once the gesture goes quiet
    pub fn resize_node(&mut self, id: &str, width: f64, height: f64, now: Instant) -> Result<()> {
        self.store.resize_node(id, width, height)?;
        self.debouncer.schedule(now);
        Ok(())
    }

    // ========== History ==========

    /// Drive deferred work: the debounced snapshot and the export outcome
    pub fn tick(&mut self, now: Instant) {
        if self.debouncer.poll(now) {
            self.record();
        }
        self.poll_export();
    }

    pub fn has_pending_snapshot(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn undo(&mut self) -> Result<()> {
        self.flush_pending();
        let entry = self.history.undo()?;
        let (snapshot_id, snapshot) = (entry.id, entry.snapshot.clone());
        self.restore(snapshot_id, &snapshot);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        self.flush_pending();
        let entry = self.history.redo()?;
        let (snapshot_id, snapshot) = (entry.id, entry.snapshot.clone());
        self.restore(snapshot_id, &snapshot);
        Ok(())
    }

    fn restore(&mut self, snapshot_id: Ulid, snapshot: &GraphSnapshot) {
        self.store.restore(snapshot);
        let store = &self.store;
        if self.selection.retain(|id| store.contains_node(id)) {
            debug!("selection cleared by history restore");
        }
        self.store.log_event(EventType::HistoryRestored {
            snapshot_id,
            cursor: self.history.cursor(),
        });
    }

    /// Record a pending gesture before anything else touches history
    fn flush_pending(&mut self) {
        if self.debouncer.cancel() {
            self.record();
        }
    }

    fn record(&mut self) {
        self.debouncer.cancel();
        if let Some(snapshot_id) = self.history.record(self.store.snapshot()) {
            debug!(cursor = self.history.cursor(), "snapshot recorded");
            self.store.log_event(EventType::SnapshotCreated {
                snapshot_id,
                cursor: self.history.cursor(),
            });
        }
    }

    // ========== Selection & Style Editing ==========

    /// Node clicked
    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.store.contains_node(id) {
            return Err(EditorError::node_not_found(id));
        }
        self.selection.select(id);
        Ok(())
    }

    /// Settings panel closed
    pub fn close_selection(&mut self) {
        self.selection.close();
    }

    fn selected_id(&self) -> Result<NodeId> {
        self.selection
            .selected()
            .map(str::to_string)
            .ok_or(EditorError::NoSelection)
    }

    pub fn delete_selected(&mut self) -> Result<NodeId> {
        let id = self.selected_id()?;
        self.delete_node(&id)?;
        Ok(id)
    }

    pub fn duplicate_selected(&mut self) -> Result<NodeId> {
        let id = self.selected_id()?;
        self.duplicate_node(&id)
    }

    /// Apply one settings-panel edit to the selected node
    pub fn edit_selected(&mut self, edit: StyleEdit) -> Result<()> {
        let id = self.selected_id()?;
        let node = self
            .store
            .get_node(&id)
            .ok_or_else(|| EditorError::node_not_found(&id))?;

        match plan_edit(node, &edit, self.config.aspect_ratio)? {
            StyleChange::Patch(patch) => self.patch_style(&id, &patch),
            StyleChange::Data(data) => self.update_node(&id, data),
        }
    }

    // ========== Images ==========

    /// Add an image node holding the file's contents as a data URL
    pub fn add_image_from_file(
        &mut self,
        path: &Path,
        position: Position,
    ) -> anyhow::Result<NodeId> {
        let url = read_image_as_data_url(path)?;
        Ok(self.add_node(
            NodeKind::Image,
            position,
            NodeData::default().with_image_url(url),
        ))
    }

    /// Replace the image shown by the selected image node
    pub fn replace_selected_image(&mut self, path: &Path) -> anyhow::Result<()> {
        let url = read_image_as_data_url(path)?;
        self.edit_selected(StyleEdit::ImageUrl(url))?;
        Ok(())
    }

    // ========== Event Boundary ==========

    /// Quick-add an action node at a random spot
    pub fn quick_add(&mut self, rng: &mut impl Rng) -> NodeId {
        let (ox, oy) = self.config.quick_add_origin;
        let (sx, sy) = self.config.quick_add_span;
        let position = Position::new(
            ox + rng.gen_range(0.0..1.0) * sx,
            oy + rng.gen_range(0.0..1.0) * sy,
        );
        self.add_node(NodeKind::Action, position, NodeData::default())
    }

    /// Translate a renderer gesture into a state transition
    pub fn apply_change(&mut self, change: CanvasChange, now: Instant) {
        let settles = matches!(
            change,
            CanvasChange::Position { dragging: false, .. }
                | CanvasChange::Dimensions { resizing: false, .. }
        );

        let result = match change {
            CanvasChange::Position { id, position, .. } => self.move_node(&id, position, now),
            CanvasChange::Dimensions {
                id, width, height, ..
            } => self.resize_node(&id, width, height, now),
            CanvasChange::Select { id } => self.select(&id),
            CanvasChange::Connect {
                source,
                target,
                source_handle,
            } => self
                .connect(&source, &target, source_handle.as_deref())
                .map(|_| ()),
            CanvasChange::RemoveNode { id } => self.delete_node(&id).map(|_| ()),
            CanvasChange::RemoveEdge { id } => self.delete_edge(&id),
        };

        // End of a drag or resize: record the gesture now instead of waiting out the debounce
        if settles && result.is_ok() {
            self.record();
        }

        if let Err(err) = result {
            self.report(err);
        }
    }

    /// Run the command bound to a key press.
    ///
    /// `Command::Export` is only returned: the host owns the rendered surface and must call
    /// [`Editor::start_export`] itself.
    pub fn handle_key(
        &mut self,
        chord: KeyChord,
        editing_text: bool,
        rng: &mut impl Rng,
    ) -> Option<Command> {
        let command = command_for(chord, editing_text)?;

        let result = match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::QuickAdd => {
                let id = self.quick_add(rng);
                self.notices.push(Notice::success(format!("Added {}", id)));
                Ok(())
            }
            Command::DeleteSelected => self.delete_selected().map(|_| ()),
            Command::DuplicateSelected => self.duplicate_selected().map(|_| ()),
            Command::Export => Ok(()),
        };

        if let Err(err) = result {
            self.report(err);
        }
        Some(command)
    }

    /// Surface an error: user-facing ones become notices, invariant violations are logged
    pub fn report(&mut self, err: EditorError) {
        if err.is_user_facing() {
            info!("{}", err);
            self.notices.push(Notice::from(&err));
        } else {
            warn!("ignored invalid mutation: {}", err);
        }
    }

    /// Take queued notices for display
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ========== Export ==========

    /// Begin exporting the rendered surface; the outcome arrives through [`Editor::tick`]
    pub fn start_export(&mut self, pipeline: &ExportPipeline, surface: Surface) -> Result<()> {
        if self.export_job.is_some() {
            let err = EditorError::ExportInProgress;
            self.notices.push(Notice::from(&err));
            return Err(err);
        }

        self.notices.push(Notice::info("Preparing download..."));
        self.export_job = Some(pipeline.spawn(surface));
        Ok(())
    }

    pub fn export_in_progress(&self) -> bool {
        self.export_job.is_some()
    }

    /// Abandon an in-flight export; nothing is saved once the worker sees the cancel
    pub fn cancel_export(&mut self) -> bool {
        let Some(job) = self.export_job.take() else {
            return false;
        };
        job.cancel();
        info!("export cancelled");
        self.notices.push(Notice::info("Download cancelled"));
        true
    }

    fn poll_export(&mut self) {
        let Some(outcome) = self.export_job.as_ref().and_then(ExportJob::poll) else {
            return;
        };
        self.export_job = None;

        match outcome {
            Ok(_) => self
                .notices
                .push(Notice::success("Flowchart downloaded successfully!")),
            Err(err) => self.report(err),
        }
    }
}

//! Editor state and the operations that mutate it.
//!
//! `EditorState` owns the authoritative markup collection. Every mutation
//! records the previous collection in the history before it is applied,
//! so any edit can be undone by restoring that snapshot.

use crate::blueprint::{Blueprint, BlueprintError};
use crate::config::{ConfigError, EditorConfig};
use crate::document::{BlueprintRef, MarkupDocument};
use crate::history::History;
use crate::markup::{FontSizeBucket, MarkupColor, MarkupObject, MarkupShape, ObjectId, StampSize};
use crate::shortcuts::{EditorCommand, KeyChord};
use crate::tools::{Tool, ToolState};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};

/// Screen distance a box press must travel before it counts as a drag.
const DRAG_THRESHOLD: f64 = 4.0;

/// Screen padding kept around the blueprint when fitting it to the view.
const FIT_PADDING: f64 = 20.0;

/// Which modal dialogs the host should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogFlags {
    pub save: bool,
    pub open: bool,
    pub share: bool,
}

/// Result of feeding a pointer event to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// The event had no effect.
    Ignored,
    /// The selection was updated.
    Selection,
    /// A gesture started or progressed.
    Gesture,
    /// A new object was committed.
    Created(ObjectId),
    /// The selection was dragged to a new position as one undoable step.
    Moved,
    /// The text tool needs content for a text object at this document point.
    /// Follow up with [`EditorState::commit_text`].
    TextRequested(Point),
}

/// The complete state of one editing session.
#[derive(Debug, Clone)]
pub struct EditorState {
    /// The stored document being edited. None for an unsaved new document.
    pub current_file: Option<MarkupDocument>,
    /// Markup in paint order, front-most last.
    pub markup_objects: Vec<MarkupObject>,
    pub tool_state: ToolState,
    pub viewer_state: Viewport,
    pub history: History,
    pub is_loading: bool,
    pub is_saving: bool,
    pub dialogs: DialogFlags,
    /// Blueprint the markup is drawn on.
    pub blueprint: Option<Blueprint>,
    pub config: EditorConfig,
    /// Collection as it was when a selection drag started.
    move_origin: Option<Vec<MarkupObject>>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Create an empty editor with the default configuration.
    pub fn new() -> Self {
        Self::build(EditorConfig::default())
    }

    /// Create an empty editor with the given configuration.
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        Self {
            current_file: None,
            markup_objects: Vec::new(),
            tool_state: ToolState::new(),
            viewer_state: config.viewport(),
            history: History::new(config.history_depth),
            is_loading: false,
            is_saving: false,
            dialogs: DialogFlags::default(),
            blueprint: None,
            config,
            move_origin: None,
        }
    }

    /// Discard everything and start a new, unsaved document.
    pub fn reset(&mut self) {
        *self = Self::build(self.config.clone());
    }

    /// Get an object by id.
    pub fn get_object(&self, id: &str) -> Option<&MarkupObject> {
        self.markup_objects.iter().find(|o| o.id() == id)
    }

    /// Number of objects in the document.
    pub fn len(&self) -> usize {
        self.markup_objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markup_objects.is_empty()
    }

    // --- History ---

    /// Append an object as one undoable step.
    pub fn commit_object(&mut self, object: MarkupObject) -> ObjectId {
        let id = object.id().to_string();
        self.record_history();
        log::debug!("Committed {} {}", object.kind().name(), id);
        self.markup_objects.push(object);
        id
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.abort_move();
        match self.history.undo(&self.markup_objects) {
            Some(snapshot) => {
                self.markup_objects = snapshot;
                self.prune_selection();
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.abort_move();
        match self.history.redo(&self.markup_objects) {
            Some(snapshot) => {
                self.markup_objects = snapshot;
                self.prune_selection();
                true
            }
            None => false,
        }
    }

    /// Snapshot the collection before a mutation. A drag in progress is settled first.
    fn record_history(&mut self) {
        self.finish_move();
        self.history.record(&self.markup_objects);
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Selection & clipboard ---

    fn is_selected(&self, object: &MarkupObject) -> bool {
        self.tool_state.selected_objects.contains(object.id())
    }

    fn prune_selection(&mut self) {
        let objects = &self.markup_objects;
        self.tool_state
            .selected_objects
            .retain(|id| objects.iter().any(|o| o.id() == id));
    }

    /// Selected objects in paint order. Stale ids are skipped.
    pub fn selected_objects(&self) -> Vec<&MarkupObject> {
        self.markup_objects
            .iter()
            .filter(|o| self.is_selected(o))
            .collect()
    }

    /// Clear the selection. Not undoable.
    pub fn deselect_all(&mut self) {
        self.tool_state.selected_objects.clear();
    }

    /// Select every object. Not undoable.
    pub fn select_all(&mut self) {
        self.tool_state.selected_objects = self
            .markup_objects
            .iter()
            .map(|o| o.id().to_string())
            .collect();
    }

    /// Find the front-most object under a document point.
    pub fn object_at(&self, point: Point) -> Option<&MarkupObject> {
        let tolerance = self.config.hit_tolerance / self.viewer_state.zoom;
        self.markup_objects
            .iter()
            .rev()
            .find(|o| o.hit_test(point, tolerance))
    }

    /// Select the front-most object under a document point.
    ///
    /// Without `additive` the hit replaces the selection and a miss clears
    /// it. With `additive` the hit is added and a miss changes nothing.
    pub fn select_at(&mut self, point: Point, additive: bool) -> Option<ObjectId> {
        let hit = self.object_at(point).map(|o| o.id().to_string());
        if !additive {
            self.tool_state.selected_objects.clear();
        }
        if let Some(id) = &hit {
            self.tool_state.selected_objects.insert(id.clone());
        }
        hit
    }

    /// Remove every selected object as one undoable step.
    pub fn delete_selected(&mut self) -> bool {
        if self.tool_state.selected_objects.is_empty() {
            return false;
        }
        if !self.markup_objects.iter().any(|o| self.is_selected(o)) {
            self.deselect_all();
            return false;
        }

        self.record_history();
        let selected = std::mem::take(&mut self.tool_state.selected_objects);
        let before = self.markup_objects.len();
        self.markup_objects.retain(|o| !selected.contains(o.id()));
        log::debug!("Deleted {} objects", before - self.markup_objects.len());
        true
    }

    /// Copy the selected objects to the clipboard. Not undoable.
    pub fn copy_selected(&mut self) -> bool {
        let copied: Vec<MarkupObject> = self.selected_objects().into_iter().cloned().collect();
        if copied.is_empty() {
            return false;
        }
        self.tool_state.clipboard = copied;
        true
    }

    /// Paste the clipboard as new objects offset from their sources.
    ///
    /// The clipboard keeps the originals, so repeated pastes land at the
    /// same offset. The pasted objects become the selection.
    pub fn paste(&mut self) -> bool {
        if self.tool_state.clipboard.is_empty() {
            return false;
        }
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        let pasted: Vec<MarkupObject> = self
            .tool_state
            .clipboard
            .iter()
            .cloned()
            .map(|mut object| {
                object.regenerate_id();
                object.translate(offset);
                object
            })
            .collect();

        self.record_history();
        self.tool_state.selected_objects = pasted.iter().map(|o| o.id().to_string()).collect();
        log::debug!("Pasted {} objects", pasted.len());
        self.markup_objects.extend(pasted);
        true
    }

    /// Apply an edit to every selected object as one undoable step.
    ///
    /// `edit` returns whether it applied to the object. Nothing is recorded
    /// when it applies to none of them.
    fn edit_selected(&mut self, mut edit: impl FnMut(&mut MarkupObject) -> bool) -> bool {
        let mut next = self.markup_objects.clone();
        let mut changed = false;
        for object in next.iter_mut() {
            if self.tool_state.selected_objects.contains(object.id()) && edit(object) {
                object.touch();
                changed = true;
            }
        }
        if changed {
            self.record_history();
            self.markup_objects = next;
        }
        changed
    }

    /// Recolor the selection.
    pub fn set_selected_color(&mut self, color: MarkupColor) -> bool {
        self.edit_selected(|o| o.set_color(color))
    }

    /// Change the outline of selected boxes.
    pub fn set_selected_box_shape(&mut self, shape: MarkupShape) -> bool {
        self.edit_selected(|o| matches!(o, MarkupObject::Box(_)) && o.set_shape(shape))
    }

    /// Change the label of selected boxes. An empty label removes it.
    pub fn set_selected_label(&mut self, label: Option<String>) -> bool {
        self.edit_selected(|o| o.set_label(label.clone()))
    }

    pub fn set_selected_text_content(&mut self, content: &str) -> bool {
        self.edit_selected(|o| o.set_content(content))
    }

    pub fn set_selected_font_size(&mut self, size: FontSizeBucket) -> bool {
        self.edit_selected(|o| o.set_font_size(size.points()))
    }

    pub fn set_selected_stamp_size(&mut self, size: StampSize) -> bool {
        self.edit_selected(|o| o.set_stamp_size(size))
    }

    /// Move the selection by a document-space delta.
    pub fn move_selected(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.edit_selected(|o| {
            o.translate(delta);
            true
        })
    }

    // --- Tools & pointer input ---

    /// Activate a tool. Zoom tools apply once and leave the active tool alone.
    pub fn set_tool(&mut self, tool: Tool) {
        match tool {
            Tool::ZoomIn => self.viewer_state.zoom_in(),
            Tool::ZoomOut => self.viewer_state.zoom_out(),
            _ => {
                log::debug!("Tool: {}", tool);
                self.abort_move();
                self.tool_state.set_tool(tool);
            }
        }
    }

    /// Handle a pointer press at a screen position.
    pub fn pointer_down(&mut self, screen: Point, additive: bool) -> PointerOutcome {
        let point = self.viewer_state.screen_to_document(screen);
        match self.tool_state.active_tool {
            Tool::Select => {
                let hit = self.object_at(point).map(|o| o.id().to_string());
                let already_selected = hit
                    .as_ref()
                    .is_some_and(|id| self.tool_state.selected_objects.contains(id));
                // A press on a selected object drags the whole selection.
                if !already_selected {
                    self.select_at(point, additive);
                }
                if hit.is_some() {
                    self.move_origin = Some(self.markup_objects.clone());
                    self.tool_state.begin_move(point);
                }
                PointerOutcome::Selection
            }
            Tool::Pan => {
                self.tool_state.begin_pan(screen);
                PointerOutcome::Gesture
            }
            Tool::Box(_) | Tool::Stamp => {
                self.tool_state.begin_place(point);
                PointerOutcome::Gesture
            }
            Tool::Pen => {
                self.tool_state.begin_stroke(point);
                PointerOutcome::Gesture
            }
            Tool::Text => PointerOutcome::TextRequested(point),
            Tool::ZoomIn | Tool::ZoomOut => PointerOutcome::Ignored,
        }
    }

    /// Handle pointer motion at a screen position.
    pub fn pointer_move(&mut self, screen: Point) -> PointerOutcome {
        match self.tool_state.active_tool {
            Tool::Pan => match self.tool_state.drag_pan(screen) {
                Some(delta) => {
                    self.viewer_state.pan(delta.x, delta.y);
                    PointerOutcome::Gesture
                }
                None => PointerOutcome::Ignored,
            },
            Tool::Pen if self.tool_state.is_drawing => {
                let point = self.viewer_state.screen_to_document(screen);
                self.tool_state.extend_stroke(point);
                PointerOutcome::Gesture
            }
            Tool::Select => {
                let point = self.viewer_state.screen_to_document(screen);
                match self.tool_state.drag_move(point) {
                    Some(delta) if delta != Vec2::ZERO => {
                        self.translate_selected(delta);
                        PointerOutcome::Gesture
                    }
                    Some(_) => PointerOutcome::Gesture,
                    None => PointerOutcome::Ignored,
                }
            }
            _ => PointerOutcome::Ignored,
        }
    }

    /// Move the selection in place during a drag. History is recorded on release.
    fn translate_selected(&mut self, delta: Vec2) {
        let selected = &self.tool_state.selected_objects;
        for object in self.markup_objects.iter_mut() {
            if selected.contains(object.id()) {
                object.translate(delta);
                object.touch();
            }
        }
    }

    /// Finish a selection drag, recording the pre-drag collection if anything moved.
    fn finish_move(&mut self) -> bool {
        let origin = self.move_origin.take();
        if !self.tool_state.end_move() {
            return false;
        }
        match origin {
            Some(origin) if origin != self.markup_objects => {
                self.history.record(&origin);
                log::debug!("Moved {} objects", self.tool_state.selected_objects.len());
                true
            }
            _ => false,
        }
    }

    /// Drop a selection drag, putting the objects back where it started.
    fn abort_move(&mut self) {
        if let Some(origin) = self.move_origin.take() {
            if self.tool_state.end_move() {
                self.markup_objects = origin;
            }
        }
    }

    /// Handle a pointer release at a screen position.
    pub fn pointer_up(&mut self, screen: Point) -> PointerOutcome {
        let point = self.viewer_state.screen_to_document(screen);
        let created = match self.tool_state.active_tool {
            Tool::Pan => {
                self.tool_state.end_pan();
                None
            }
            Tool::Pen => self.tool_state.finish_stroke(point).map(MarkupObject::from),
            Tool::Box(_) | Tool::Stamp => {
                let threshold = DRAG_THRESHOLD / self.viewer_state.zoom;
                self.tool_state.finish_place(point, threshold)
            }
            Tool::Select => {
                return if self.finish_move() {
                    PointerOutcome::Moved
                } else {
                    PointerOutcome::Ignored
                };
            }
            Tool::Text | Tool::ZoomIn | Tool::ZoomOut => None,
        };
        match created {
            Some(object) => PointerOutcome::Created(self.commit_object(object)),
            None => PointerOutcome::Ignored,
        }
    }

    /// Commit a text object at a document point. Blank content is discarded.
    pub fn commit_text(&mut self, point: Point, content: &str) -> Option<ObjectId> {
        let text = self.tool_state.create_text(point, content)?;
        Some(self.commit_object(text.into()))
    }

    /// Abandon any in-flight gesture.
    pub fn cancel_gesture(&mut self) {
        self.abort_move();
        self.tool_state.cancel();
    }

    // --- Keyboard ---

    /// Dispatch a key chord. Returns the command it triggered, if any.
    pub fn handle_key(&mut self, chord: KeyChord) -> Option<EditorCommand> {
        let command = EditorCommand::from_chord(chord)?;
        self.execute(command);
        Some(command)
    }

    /// Run an editor command. Returns true if it changed anything.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Save => {
                self.dialogs.save = true;
                true
            }
            EditorCommand::Open => {
                self.dialogs.open = true;
                true
            }
            EditorCommand::Copy => self.copy_selected(),
            EditorCommand::Paste => self.paste(),
            EditorCommand::SelectAll => {
                self.select_all();
                true
            }
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::Escape => {
                let busy = self.tool_state.is_active() || !self.tool_state.selected_objects.is_empty();
                self.cancel_gesture();
                self.deselect_all();
                busy
            }
        }
    }

    // --- Blueprint ---

    /// Validate an uploaded file and make it the blueprint.
    /// Rejected files leave the editor untouched.
    pub fn upload_blueprint(&mut self, file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), BlueprintError> {
        let blueprint = Blueprint::from_upload(file_name, mime, bytes, self.config.max_upload_bytes)?;
        self.load_blueprint(blueprint);
        Ok(())
    }

    /// Install a blueprint. Inline raster images are probed right away;
    /// for anything else the host reports through [`apply_blueprint_decode`].
    ///
    /// [`apply_blueprint_decode`]: EditorState::apply_blueprint_decode
    pub fn load_blueprint(&mut self, blueprint: Blueprint) {
        self.viewer_state.clear_image_size();
        let probe = blueprint.is_inline() && blueprint.format.is_some_and(|f| f.is_raster());
        let decoded = probe.then(|| blueprint.decode_dimensions());
        log::info!("Loaded blueprint {}", blueprint.file_name);
        self.blueprint = Some(blueprint);
        if let Some(result) = decoded {
            self.apply_blueprint_decode(result);
        }
    }

    /// Record the outcome of decoding the blueprint image.
    ///
    /// Failure is not fatal: the editor stays usable and the image size
    /// stays unknown.
    pub fn apply_blueprint_decode(&mut self, result: Result<(u32, u32), BlueprintError>) -> bool {
        match result {
            Ok((width, height)) => {
                self.viewer_state.set_image_size(width, height);
                log::debug!("Blueprint decoded: {}x{}", width, height);
                true
            }
            Err(e) => {
                log::warn!("Blueprint decode failed: {}", e);
                false
            }
        }
    }

    /// Reference to the current blueprint as stored with documents.
    pub fn blueprint_ref(&self) -> Option<BlueprintRef> {
        self.blueprint.as_ref().map(|b| BlueprintRef {
            url: b.url.clone(),
            original_file_name: b.file_name.clone(),
        })
    }

    /// Fit the blueprint into a viewport of the given screen size.
    pub fn fit_to_blueprint(&mut self, viewport: Size) {
        self.viewer_state.fit_to_image(viewport, FIT_PADDING);
    }

    // --- Documents ---

    /// Replace the session with a stored document.
    ///
    /// History and selection are cleared and the viewport is reset; the
    /// clipboard survives so markup can be copied between documents.
    pub fn install_document(&mut self, document: MarkupDocument) {
        self.markup_objects = document.markup_data.clone();
        self.history.clear();
        self.move_origin = None;
        self.tool_state.cancel();
        self.deselect_all();
        self.viewer_state = self.config.viewport();
        self.blueprint = None;
        if !document.blueprint.url.is_empty() {
            self.load_blueprint(Blueprint::from_url(
                &document.blueprint.url,
                &document.blueprint.original_file_name,
            ));
        }
        self.current_file = Some(document);
    }
}

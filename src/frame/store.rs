//! Frame Store
//!
//! The canonical ordered collection of frames, the selection, and the grid
//! density. A store is an explicit state container: the host constructs it
//! once and hands clones of the handle to every consumer.
//!
//! Every mutation bumps a revision published on a watch channel, so cursors
//! and hosts can tell when to re-validate their view of the frame list.

use super::{Frame, FrameId, FrameUpdate, GridConfig, GridDensity, Selection};
use crate::dispatch::{GeneratedImage, ImageSource};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The frame now shows the new image.
    Resolved { width: u32, height: u32 },
    /// Generation failed; the frame kept its previous state.
    Failed,
    /// The frame (or the store) was gone when the image arrived.
    Discarded,
}

/// Handle to a generation started by [`FrameStore::add_frame`] or
/// [`FrameStore::refresh_frame_image`]. Dropping it does not cancel the work.
///
/// A ticket without a task means no runtime was available to run the
/// generation; it settles as [`GenerationOutcome::Failed`].
#[derive(Debug)]
pub struct GenerationTicket {
    frame_id: FrameId,
    handle: Option<JoinHandle<GenerationOutcome>>,
}

impl GenerationTicket {
    pub fn frame_id(&self) -> &FrameId {
        &self.frame_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the generation to settle.
    pub async fn wait(self) -> GenerationOutcome {
        match self.handle {
            Some(handle) => handle.await.unwrap_or(GenerationOutcome::Failed),
            None => GenerationOutcome::Failed,
        }
    }
}

/// Read-only copy of the store state.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    pub frames: Vec<Frame>,
    pub selection_mode: bool,
    /// In frame order.
    pub selected_ids: Vec<FrameId>,
    pub column_width: u32,
    pub revision: u64,
}

#[derive(Debug, Default)]
struct GridState {
    frames: Vec<Frame>,
    selection: Selection,
    density: GridDensity,
}

impl GridState {
    fn position(&self, id: &FrameId) -> Option<usize> {
        self.frames.iter().position(|frame| &frame.id == id)
    }

    fn contains(&self, id: &FrameId) -> bool {
        self.position(id).is_some()
    }
}

struct StoreInner {
    state: RwLock<GridState>,
    source: Arc<dyn ImageSource>,
    /// Runtime the store was built on, used when called from outside one.
    runtime: Option<Handle>,
    revision: watch::Sender<u64>,
}

impl StoreInner {
    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn apply_image(&self, id: &FrameId, image: &GeneratedImage) -> GenerationOutcome {
        let outcome = {
            let mut state = self.state.write();
            match state.frames.iter_mut().find(|frame| &frame.id == id) {
                Some(frame) => {
                    frame.resolve(image);
                    GenerationOutcome::Resolved {
                        width: image.width,
                        height: image.height,
                    }
                }
                None => GenerationOutcome::Discarded,
            }
        };
        match outcome {
            GenerationOutcome::Resolved { width, height } => {
                self.bump();
                debug!(frame_id = %id, width, height, "Frame image resolved");
            }
            _ => debug!(frame_id = %id, "Frame removed before its image arrived"),
        }
        outcome
    }
}

/// Shared handle to the frame collection.
#[derive(Clone)]
pub struct FrameStore {
    inner: Arc<StoreInner>,
}

impl FrameStore {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self::with_config(source, &GridConfig::default())
    }

    /// Build a store. Generation runs on the ambient Tokio runtime, falling
    /// back to the runtime that was current here.
    pub fn with_config(source: Arc<dyn ImageSource>, config: &GridConfig) -> Self {
        let (revision, _) = watch::channel(0);
        let state = GridState {
            density: GridDensity::new(config.initial_column_width),
            ..GridState::default()
        };
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                source,
                runtime: Handle::try_current().ok(),
                revision,
            }),
        }
    }

    // ---- frames ----

    /// Append a pending frame and start generating its image.
    ///
    /// The frame is visible immediately with placeholder dimensions. On
    /// failure it stays pending.
    pub fn add_frame(&self) -> GenerationTicket {
        let id = {
            let mut state = self.inner.state.write();
            let id = loop {
                let candidate = FrameId::generate();
                if !state.contains(&candidate) {
                    break candidate;
                }
            };
            state.frames.push(Frame::pending(id.clone()));
            id
        };
        self.inner.bump();
        debug!(frame_id = %id, "Frame added");
        self.spawn_generation(id, "add")
    }

    /// Regenerate the image of an existing frame. The current image stays
    /// in place until the new one arrives. Returns `None` for unknown ids.
    pub fn refresh_frame_image(&self, id: &FrameId) -> Option<GenerationTicket> {
        if !self.inner.state.read().contains(id) {
            debug!(frame_id = %id, "Refresh ignored, unknown frame");
            return None;
        }
        debug!(frame_id = %id, "Refreshing frame image");
        Some(self.spawn_generation(id.clone(), "refresh"))
    }

    fn spawn_generation(&self, id: FrameId, action: &'static str) -> GenerationTicket {
        let runtime = Handle::try_current()
            .ok()
            .or_else(|| self.inner.runtime.clone());
        let Some(runtime) = runtime else {
            warn!(frame_id = %id, action, "No Tokio runtime available, generation skipped");
            return GenerationTicket {
                frame_id: id,
                handle: None,
            };
        };

        let source = Arc::clone(&self.inner.source);
        let store: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let frame_id = id.clone();

        let handle = runtime.spawn(async move {
            match source.generate_image(frame_id.as_str()).await {
                Ok(image) => match store.upgrade() {
                    Some(inner) => inner.apply_image(&frame_id, &image),
                    None => GenerationOutcome::Discarded,
                },
                Err(e) => {
                    warn!(frame_id = %frame_id, action, error = %e, "Image generation failed");
                    GenerationOutcome::Failed
                }
            }
        });

        GenerationTicket {
            frame_id: id,
            handle: Some(handle),
        }
    }

    /// Merge `update` into the frame. Returns false for unknown ids.
    pub fn update_frame(&self, id: &FrameId, update: FrameUpdate) -> bool {
        let updated = {
            let mut state = self.inner.state.write();
            match state.frames.iter_mut().find(|frame| &frame.id == id) {
                Some(frame) => {
                    frame.apply(update);
                    true
                }
                None => false,
            }
        };
        if updated {
            self.inner.bump();
            debug!(frame_id = %id, "Frame updated");
        }
        updated
    }

    /// Remove a frame and drop it from the selection.
    pub fn remove_frame(&self, id: &FrameId) -> bool {
        let removed = {
            let mut state = self.inner.state.write();
            match state.position(id) {
                Some(index) => {
                    state.frames.remove(index);
                    state.selection.remove(id);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.inner.bump();
            debug!(frame_id = %id, "Frame removed");
        }
        removed
    }

    /// Remove every selected frame, clear the selection and leave
    /// selection mode. Returns the number of frames removed.
    pub fn delete_selected(&self) -> usize {
        let removed = {
            let mut state = self.inner.state.write();
            let GridState {
                frames, selection, ..
            } = &mut *state;
            let before = frames.len();
            frames.retain(|frame| !selection.contains(&frame.id));
            selection.reset();
            before - frames.len()
        };
        self.inner.bump();
        debug!(count = removed, "Deleted selected frames");
        removed
    }

    // ---- selection ----

    /// Flip selection mode. The selection is cleared either way.
    pub fn toggle_selection_mode(&self) -> bool {
        let mode = self.inner.state.write().selection.toggle_mode();
        self.inner.bump();
        debug!(selection_mode = mode, "Toggled selection mode");
        mode
    }

    /// Add or remove one id. Ids of frames not in the store are ignored.
    pub fn toggle_select(&self, id: &FrameId) -> bool {
        let selected = {
            let mut state = self.inner.state.write();
            if !state.contains(id) {
                return false;
            }
            let selected = state.selection.toggle(id);
            debug!(
                frame_id = %id,
                selected,
                total = state.selection.len(),
                "Toggled frame selection"
            );
            selected
        };
        self.inner.bump();
        selected
    }

    pub fn select_all(&self) {
        {
            let mut state = self.inner.state.write();
            let GridState {
                frames, selection, ..
            } = &mut *state;
            selection.select_only(frames.iter().map(|frame| &frame.id));
        }
        self.inner.bump();
    }

    pub fn clear_selection(&self) {
        self.inner.state.write().selection.clear();
        self.inner.bump();
    }

    pub fn select_many(&self, ids: &[FrameId]) {
        self.with_known_ids(ids, |selection, known| selection.select_many(known));
    }

    pub fn deselect_many(&self, ids: &[FrameId]) {
        self.with_known_ids(ids, |selection, known| selection.deselect_many(known));
    }

    pub fn toggle_many(&self, ids: &[FrameId]) {
        self.with_known_ids(ids, |selection, known| selection.toggle_many(known));
    }

    fn with_known_ids<F>(&self, ids: &[FrameId], apply: F)
    where
        F: FnOnce(&mut Selection, Vec<&FrameId>),
    {
        {
            let mut state = self.inner.state.write();
            let GridState {
                frames, selection, ..
            } = &mut *state;
            let known: Vec<&FrameId> = ids
                .iter()
                .filter(|id| frames.iter().any(|frame| &frame.id == *id))
                .collect();
            apply(selection, known);
        }
        self.inner.bump();
    }

    pub fn selection_mode(&self) -> bool {
        self.inner.state.read().selection.is_active()
    }

    pub fn is_selected(&self, id: &FrameId) -> bool {
        self.inner.state.read().selection.contains(id)
    }

    pub fn selection_count(&self) -> usize {
        self.inner.state.read().selection.len()
    }

    pub fn selected_ids(&self) -> HashSet<FrameId> {
        self.inner.state.read().selection.ids().clone()
    }

    // ---- grid density ----

    /// Clamp and store a column width. Returns the stored value.
    pub fn set_column_width(&self, value: u32) -> u32 {
        let width = self.inner.state.write().density.set_column_width(value);
        self.inner.bump();
        width
    }

    pub fn step_up(&self) -> u32 {
        self.step(GridDensity::step_up)
    }

    pub fn step_down(&self) -> u32 {
        self.step(GridDensity::step_down)
    }

    fn step(&self, step: fn(&mut GridDensity) -> bool) -> u32 {
        let (changed, width) = {
            let mut state = self.inner.state.write();
            let changed = step(&mut state.density);
            (changed, state.density.column_width())
        };
        if changed {
            self.inner.bump();
            debug!(column_width = width, "Grid density changed");
        }
        width
    }

    pub fn column_width(&self) -> u32 {
        self.inner.state.read().density.column_width()
    }

    // ---- reads ----

    pub fn frames(&self) -> Vec<Frame> {
        self.inner.state.read().frames.clone()
    }

    pub fn frame(&self, id: &FrameId) -> Option<Frame> {
        self.inner
            .state
            .read()
            .frames
            .iter()
            .find(|frame| &frame.id == id)
            .cloned()
    }

    pub fn frame_ids(&self) -> Vec<FrameId> {
        self.inner
            .state
            .read()
            .frames
            .iter()
            .map(|frame| frame.id.clone())
            .collect()
    }

    /// Ids of frames with an image, in store order.
    pub fn resolved_ids(&self) -> Vec<FrameId> {
        self.inner
            .state
            .read()
            .frames
            .iter()
            .filter(|frame| frame.is_resolved())
            .map(|frame| frame.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.state.read().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.read().frames.is_empty()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let state = self.inner.state.read();
        GridSnapshot {
            frames: state.frames.clone(),
            selection_mode: state.selection.is_active(),
            selected_ids: state
                .frames
                .iter()
                .filter(|frame| state.selection.contains(&frame.id))
                .map(|frame| frame.id.clone())
                .collect(),
            column_width: state.density.column_width(),
            revision: self.revision(),
        }
    }

    /// Current revision. Changes after every mutation.
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Receiver notified on every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }
}

impl std::fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("FrameStore")
            .field("frames", &state.frames.len())
            .field("selection", &state.selection.len())
            .field("column_width", &state.density.column_width())
            .field("revision", &self.revision())
            .finish()
    }
}

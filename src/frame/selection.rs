//! Multi-select state.

use super::FrameId;
use std::collections::HashSet;

/// Selection mode flag plus the set of selected ids.
///
/// Toggling the mode in either direction clears the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: bool,
    ids: HashSet<FrameId>,
}

impl Selection {
    pub fn is_active(&self) -> bool {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> bool {
        self.mode = !self.mode;
        self.ids.clear();
        self.mode
    }

    /// Leave selection mode and drop the selection.
    pub fn reset(&mut self) {
        self.mode = false;
        self.ids.clear();
    }

    /// Symmetric difference with `{id}`. Returns whether `id` is now selected.
    pub fn toggle(&mut self, id: &FrameId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn select_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a FrameId>) {
        self.ids.extend(ids.into_iter().cloned());
    }

    pub fn deselect_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a FrameId>) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    pub fn toggle_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a FrameId>) {
        for id in ids {
            self.toggle(id);
        }
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_only<'a>(&mut self, ids: impl IntoIterator<Item = &'a FrameId>) {
        self.ids = ids.into_iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn remove(&mut self, id: &FrameId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &FrameId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &HashSet<FrameId> {
        &self.ids
    }
}

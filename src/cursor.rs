//! Navigation Cursor
//!
//! Tracks the current frame of one consuming view (overlay, editor,
//! carousel, ...) over the frames that have an image. Every view gets its
//! own cursor over the shared [`FrameStore`].
//!
//! When the current frame is removed or loses its image the cursor resets to
//! `None`; it never jumps to a neighbour on its own.

use crate::frame::{FrameId, FrameStore};
use tracing::debug;

#[derive(Debug)]
pub struct NavigationCursor {
    store: FrameStore,
    wrap_around: bool,
    current: Option<FrameId>,
    observed_revision: u64,
}

impl NavigationCursor {
    pub fn new(store: FrameStore, wrap_around: bool) -> Self {
        let observed_revision = store.revision();
        Self {
            store,
            wrap_around,
            current: None,
            observed_revision,
        }
    }

    pub fn wrap_around(&self) -> bool {
        self.wrap_around
    }

    /// Frames that can be navigated to, in store order.
    pub fn working_set(&self) -> Vec<FrameId> {
        self.store.resolved_ids()
    }

    /// The current frame, if it is still navigable.
    pub fn current(&self) -> Option<FrameId> {
        let current = self.current.as_ref()?;
        if self.store.revision() == self.observed_revision || self.is_navigable(current) {
            Some(current.clone())
        } else {
            None
        }
    }

    /// Re-check the current id against the store, resetting it to `None` if
    /// it is no longer navigable. Returns true if the cursor was reset.
    pub fn revalidate(&mut self) -> bool {
        let revision = self.store.revision();
        if revision == self.observed_revision {
            return false;
        }
        self.observed_revision = revision;

        match &self.current {
            Some(id) if !self.is_navigable(id) => {
                debug!(frame_id = %id, "Cursor target gone, resetting");
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Move to `id`. Ignored if `id` is not navigable or already current.
    pub fn set_current(&mut self, id: &FrameId) -> bool {
        self.revalidate();
        if self.current.as_ref() == Some(id) || !self.is_navigable(id) {
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn go_to_previous(&mut self) -> bool {
        self.step(Direction::Previous)
    }

    pub fn go_to_next(&mut self) -> bool {
        self.step(Direction::Next)
    }

    pub fn go_to_first(&mut self) -> bool {
        self.revalidate();
        match self.working_set().first() {
            Some(first) => self.replace(first),
            None => false,
        }
    }

    pub fn go_to_last(&mut self) -> bool {
        self.revalidate();
        match self.working_set().last() {
            Some(last) => self.replace(last),
            None => false,
        }
    }

    /// Position of the current frame within the working set.
    pub fn index(&self) -> Option<usize> {
        let current = self.current()?;
        self.working_set().iter().position(|id| *id == current)
    }

    pub fn has_previous(&self) -> bool {
        self.neighbour(Direction::Previous).is_some()
    }

    pub fn has_next(&self) -> bool {
        self.neighbour(Direction::Next).is_some()
    }

    /// Up to `count` navigable frames on each side of the current one,
    /// current included, for carousel strips. Empty without a current frame.
    pub fn adjacent(&self, count: usize) -> Vec<FrameId> {
        let set = self.working_set();
        let Some(index) = self.position_in(&set) else {
            return Vec::new();
        };
        let start = index.saturating_sub(count);
        let end = (index + count + 1).min(set.len());
        set[start..end].to_vec()
    }

    fn step(&mut self, direction: Direction) -> bool {
        self.revalidate();
        match self.neighbour(direction) {
            Some(target) => self.replace(&target),
            None => false,
        }
    }

    fn neighbour(&self, direction: Direction) -> Option<FrameId> {
        let set = self.working_set();
        if set.len() < 2 {
            return None;
        }
        let index = self.position_in(&set)?;
        let last = set.len() - 1;
        let target = match direction {
            Direction::Previous if index > 0 => index - 1,
            Direction::Previous if self.wrap_around => last,
            Direction::Next if index < last => index + 1,
            Direction::Next if self.wrap_around => 0,
            _ => return None,
        };
        Some(set[target].clone())
    }

    fn position_in(&self, set: &[FrameId]) -> Option<usize> {
        let current = self.current.as_ref()?;
        set.iter().position(|id| id == current)
    }

    fn replace(&mut self, id: &FrameId) -> bool {
        if self.current.as_ref() == Some(id) {
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    fn is_navigable(&self, id: &FrameId) -> bool {
        self.store
            .frame(id)
            .map(|frame| frame.is_resolved())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Previous,
    Next,
}

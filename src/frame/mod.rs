//! Frames
//!
//! A frame is one gallery entry: a stable id, an editable label and, once
//! generation completes, an encoded image with its true pixel dimensions.

pub mod grid;
pub mod selection;
pub mod store;

pub use grid::{GridConfig, GridDensity, COLUMN_WIDTH_PRESETS, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
pub use selection::Selection;
pub use store::{FrameStore, GenerationOutcome, GenerationTicket, GridSnapshot};

use crate::dispatch::GeneratedImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Characters of the id shown in a default label.
const LABEL_ID_CHARS: usize = 4;

/// Opaque frame identifier.
///
/// Generated ids are 32 hex characters: 8 random bytes followed by a
/// process-wide counter, so an id is never handed out twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(String);

impl FrameId {
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let random: [u8; 8] = rand::thread_rng().gen();
        let sequence = COUNTER.fetch_add(1, Ordering::Relaxed).to_be_bytes();
        FrameId(format!("{}{}", hex::encode(random), hex::encode(sequence)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters used in default labels.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(LABEL_ID_CHARS) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FrameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FrameId {
    fn from(id: &str) -> Self {
        FrameId(id.to_string())
    }
}

impl From<String> for FrameId {
    fn from(id: String) -> Self {
        FrameId(id)
    }
}

/// One gallery entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub id: FrameId,
    pub label: String,
    /// `1` until the image resolves.
    pub width: u32,
    /// `1` until the image resolves.
    pub height: u32,
    /// `None` while generation is pending or was never requested.
    pub image_data_url: Option<Arc<str>>,
}

impl Frame {
    pub const PLACEHOLDER_SIZE: u32 = 1;

    /// A frame waiting for its first image.
    pub fn pending(id: FrameId) -> Self {
        Self {
            label: default_label(&id),
            id,
            width: Self::PLACEHOLDER_SIZE,
            height: Self::PLACEHOLDER_SIZE,
            image_data_url: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.image_data_url.is_some()
    }

    /// Width over height, or the placeholder `1.0` while pending.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_resolved() && self.height > 0 {
            self.width as f64 / self.height as f64
        } else {
            1.0
        }
    }

    /// Replace image and dimensions together.
    pub(crate) fn resolve(&mut self, image: &GeneratedImage) {
        self.width = image.width;
        self.height = image.height;
        self.image_data_url = Some(Arc::clone(&image.data_url));
    }

    pub(crate) fn apply(&mut self, update: FrameUpdate) {
        if let Some(label) = update.label {
            self.label = label;
        }
    }
}

/// `"Frame " + first characters of the id`.
pub fn default_label(id: &FrameId) -> String {
    format!("Frame {}", id.short())
}

/// Fields to merge into a frame. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub label: Option<String>,
}

impl FrameUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

//! Grid density: the gallery's column width.

use serde::{Deserialize, Serialize};

/// Ascending column width presets, in pixels.
pub const COLUMN_WIDTH_PRESETS: [u32; 7] = [120, 160, 200, 240, 300, 360, 420];

pub const MIN_COLUMN_WIDTH: u32 = COLUMN_WIDTH_PRESETS[0];
pub const MAX_COLUMN_WIDTH: u32 = COLUMN_WIDTH_PRESETS[COLUMN_WIDTH_PRESETS.len() - 1];

const DEFAULT_COLUMN_WIDTH: u32 = 240;

/// Grid configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Column width a new store starts with
    #[serde(default = "default_column_width")]
    pub initial_column_width: u32,
}

fn default_column_width() -> u32 {
    DEFAULT_COLUMN_WIDTH
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            initial_column_width: default_column_width(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&self.initial_column_width) {
            return Err(format!(
                "initial_column_width {} outside {}..={}",
                self.initial_column_width, MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH
            ));
        }
        Ok(())
    }
}

/// Column width constrained to `[MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH]`.
///
/// Direct assignment clamps without snapping to a preset. Stepping starts
/// from the first preset at or above the current width, so stepping from a
/// width between two presets skips the lower one when going up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDensity {
    column_width: u32,
}

impl GridDensity {
    pub fn new(column_width: u32) -> Self {
        Self {
            column_width: clamp_width(column_width),
        }
    }

    pub fn column_width(&self) -> u32 {
        self.column_width
    }

    /// Returns the width actually stored.
    pub fn set_column_width(&mut self, value: u32) -> u32 {
        self.column_width = clamp_width(value);
        self.column_width
    }

    /// Move to the next wider preset. Returns whether the width changed.
    pub fn step_up(&mut self) -> bool {
        let index = (self.anchor_index() + 1).min(COLUMN_WIDTH_PRESETS.len() - 1);
        self.assign_preset(index)
    }

    /// Move to the next narrower preset. Returns whether the width changed.
    pub fn step_down(&mut self) -> bool {
        let index = self.anchor_index().saturating_sub(1);
        self.assign_preset(index)
    }

    fn anchor_index(&self) -> usize {
        COLUMN_WIDTH_PRESETS
            .iter()
            .position(|&preset| preset >= self.column_width)
            .unwrap_or(COLUMN_WIDTH_PRESETS.len() - 1)
    }

    fn assign_preset(&mut self, index: usize) -> bool {
        let width = COLUMN_WIDTH_PRESETS[index];
        let changed = width != self.column_width;
        self.column_width = width;
        changed
    }
}

impl Default for GridDensity {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH)
    }
}

fn clamp_width(value: u32) -> u32 {
    value.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

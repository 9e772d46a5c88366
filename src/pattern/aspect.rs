//! Output aspect ratios.
//!
//! Aspect ratio is the only non-deterministic input to synthesis. Everything
//! else about an image is derived from its seed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Range of the randomized `r:1` slot.
const RANDOM_RATIO_MIN: f64 = 0.5;
const RANDOM_RATIO_MAX: f64 = 2.5;

/// Width-to-height proportion of a synthesized image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    /// Fixed ratios. A randomized `r:1` ratio forms an eighth slot.
    pub const PRESETS: [AspectRatio; 7] = [
        AspectRatio::new(1.0, 1.0),
        AspectRatio::new(4.0, 3.0),
        AspectRatio::new(16.0, 9.0),
        AspectRatio::new(9.0, 16.0),
        AspectRatio::new(2.0, 1.0),
        AspectRatio::new(1.0, 2.0),
        AspectRatio::new(3.0, 4.0),
    ];

    pub const SQUARE: AspectRatio = AspectRatio::new(1.0, 1.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pick one of the eight slots uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let slot = rng.gen_range(0..=Self::PRESETS.len());
        match Self::PRESETS.get(slot) {
            Some(preset) => *preset,
            None => Self::new(rng.gen_range(RANDOM_RATIO_MIN..RANDOM_RATIO_MAX), 1.0),
        }
    }

    /// Pixel dimensions with the larger side equal to `max_dimension`.
    ///
    /// The smaller side is floored and never drops below one pixel.
    pub fn dimensions(&self, max_dimension: u32) -> (u32, u32) {
        let max = max_dimension.max(1);
        if self.width >= self.height {
            let minor = (max as f64 * self.height / self.width).floor();
            (max, (minor as u32).max(1))
        } else {
            let minor = (max as f64 * self.width / self.height).floor();
            ((minor as u32).max(1), max)
        }
    }

    /// Width divided by height.
    pub fn value(&self) -> f64 {
        self.width / self.height
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    /// Parse `W:H`, e.g. `16:9` or `1.5:1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid aspect ratio '{}' (expected W:H)", s))?;
        let parse = |part: &str| -> Result<f64, String> {
            let value: f64 = part
                .trim()
                .parse()
                .map_err(|e| format!("Invalid aspect ratio component '{}': {}", part, e))?;
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(format!("Aspect ratio components must be positive: '{}'", part))
            }
        };
        Ok(Self::new(parse(w)?, parse(h)?))
    }
}

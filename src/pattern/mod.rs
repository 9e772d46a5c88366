//! Pattern Synthesizer
//!
//! Turns an opaque seed into a bordered PNG. Hue, saturation, spatial
//! frequency, phase and pattern family are pure functions of a 32-bit hash of
//! the seed; only the aspect ratio is drawn at random, and callers that need
//! reproducible output pass a fixed [`AspectRatio`] to
//! [`synthesize_with_aspect`].

pub mod aspect;
pub mod color;
pub mod families;

pub use aspect::AspectRatio;
pub use color::Hsl;
pub use families::PatternKind;

use crate::error::SynthesisError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageFormat, Rgb, RgbImage};
use rand::Rng;
use std::io::Cursor;
use tracing::debug;

/// Default length of the longer image side.
pub const DEFAULT_MAX_DIMENSION: u32 = 1600;

/// Largest accepted `max_dimension`.
pub const MAX_DIMENSION_LIMIT: u32 = 8192;

/// Border thickness in pixels.
pub const BORDER_WIDTH: u32 = 2;

/// Lightness of the border color.
const BORDER_LIGHTNESS: f64 = 0.2;

const SECONDARY_HUE_OFFSET: u32 = 137;
const TERTIARY_HUE_OFFSET: u32 = 223;

/// Rolling `hash * 31 + code_unit` over UTF-16 code units, wrapped to a
/// signed 32-bit integer, then made non-negative.
pub fn seed_hash(seed: &str) -> u32 {
    let hash = seed
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32));
    hash.unsigned_abs()
}

/// Deterministic rendering parameters derived from a seed hash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternParams {
    /// Degrees, `[0, 360)`.
    pub base_hue: f64,
    pub secondary_hue: f64,
    pub tertiary_hue: f64,
    /// Fraction, `[0.6, 1.0]`.
    pub saturation: f64,
    /// Cycles across the image, `[2, 10]`.
    pub frequency: f64,
    /// Radians, `[0, 6.28)`.
    pub phase: f64,
    pub kind: PatternKind,
}

impl PatternParams {
    pub fn from_hash(hash: u32) -> Self {
        let base = hash % 360;
        Self {
            base_hue: base as f64,
            secondary_hue: ((base + SECONDARY_HUE_OFFSET) % 360) as f64,
            tertiary_hue: ((base + TERTIARY_HUE_OFFSET) % 360) as f64,
            saturation: (60 + (hash >> 8) % 41) as f64 / 100.0,
            frequency: (2 + (hash >> 4) % 9) as f64,
            phase: ((hash >> 12) % 628) as f64 / 100.0,
            kind: PatternKind::from_hash(hash),
        }
    }

    pub fn from_seed(seed: &str) -> Self {
        Self::from_hash(seed_hash(seed))
    }

    /// Darkened base hue used for the frame border.
    pub fn border_color(&self) -> Hsl {
        Hsl::new(self.base_hue, self.saturation, BORDER_LIGHTNESS)
    }
}

/// Encoded synthesis output.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedImage {
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub kind: PatternKind,
}

impl SynthesizedImage {
    /// `data:image/png;base64,...`
    pub fn to_data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// Wrap PNG bytes in a base64 data URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Synthesize an image with a randomly chosen aspect ratio.
pub fn synthesize<R: Rng + ?Sized>(
    seed: &str,
    max_dimension: u32,
    rng: &mut R,
) -> Result<SynthesizedImage, SynthesisError> {
    synthesize_with_aspect(seed, max_dimension, AspectRatio::random(rng))
}

/// Synthesize an image with a fixed aspect ratio. Output is byte-identical
/// for identical arguments.
pub fn synthesize_with_aspect(
    seed: &str,
    max_dimension: u32,
    aspect: AspectRatio,
) -> Result<SynthesizedImage, SynthesisError> {
    if max_dimension == 0 || max_dimension > MAX_DIMENSION_LIMIT {
        return Err(SynthesisError::InvalidDimension(max_dimension));
    }

    let params = PatternParams::from_seed(seed);
    let (width, height) = aspect.dimensions(max_dimension);
    debug!(
        seed,
        pattern = %params.kind,
        width,
        height,
        "Synthesizing pattern"
    );

    let mut pixels = render(&params, width, height);
    draw_border(&mut pixels, Rgb(params.border_color().to_rgb()));

    let mut png = Vec::new();
    pixels.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(SynthesizedImage {
        png,
        width,
        height,
        kind: params.kind,
    })
}

/// Render the pattern into a pixel buffer.
pub fn render(params: &PatternParams, width: u32, height: u32) -> RgbImage {
    let (w, h) = (width as f64, height as f64);
    RgbImage::from_fn(width, height, |x, y| {
        Rgb(params.kind.shade(params, x as f64 / w, y as f64 / h).to_rgb())
    })
}

/// Paint a solid [`BORDER_WIDTH`] border on all four edges.
pub fn draw_border(pixels: &mut RgbImage, color: Rgb<u8>) {
    let (width, height) = pixels.dimensions();
    for (x, y, pixel) in pixels.enumerate_pixels_mut() {
        let on_edge = x < BORDER_WIDTH
            || y < BORDER_WIDTH
            || x >= width.saturating_sub(BORDER_WIDTH)
            || y >= height.saturating_sub(BORDER_WIDTH);
        if on_edge {
            *pixel = color;
        }
    }
}

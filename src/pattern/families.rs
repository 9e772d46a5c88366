//! Procedural pattern families.
//!
//! Each family is a closed-form map from normalized pixel coordinates
//! `(u, v) ∈ [0, 1)²` to an HSL color, parameterized by [`PatternParams`].

use super::color::{blend_hues, mix_hue, Hsl};
use super::PatternParams;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2, TAU};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    GradientWaves,
    DiagonalGradientStripes,
    RingedRadial,
    DiamondBands,
    GridCells,
    SpiralRadial,
    HardDiagonalStripes,
    TriHueBlend,
}

impl PatternKind {
    pub const ALL: [PatternKind; 8] = [
        PatternKind::GradientWaves,
        PatternKind::DiagonalGradientStripes,
        PatternKind::RingedRadial,
        PatternKind::DiamondBands,
        PatternKind::GridCells,
        PatternKind::SpiralRadial,
        PatternKind::HardDiagonalStripes,
        PatternKind::TriHueBlend,
    ];

    /// Family for a seed hash: `hash mod 8`.
    pub fn from_hash(hash: u32) -> Self {
        Self::ALL[(hash % 8) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::GradientWaves => "gradient-waves",
            PatternKind::DiagonalGradientStripes => "diagonal-gradient-stripes",
            PatternKind::RingedRadial => "ringed-radial",
            PatternKind::DiamondBands => "diamond-bands",
            PatternKind::GridCells => "grid-cells",
            PatternKind::SpiralRadial => "spiral-radial",
            PatternKind::HardDiagonalStripes => "hard-diagonal-stripes",
            PatternKind::TriHueBlend => "tri-hue-blend",
        }
    }

    /// Color of the pixel at `(u, v)`.
    pub fn shade(self, p: &PatternParams, u: f64, v: f64) -> Hsl {
        let sat = p.saturation;
        let freq = p.frequency;
        match self {
            PatternKind::GradientWaves => {
                let wave = (u * freq * TAU + p.phase).sin();
                let hue = p.base_hue + 40.0 * wave + 30.0 * v;
                let lightness = 0.5 + 0.15 * (v * freq * PI + p.phase).sin();
                Hsl::new(hue, sat, lightness)
            }
            PatternKind::DiagonalGradientStripes => {
                let t = ((u + v) * freq * 0.5 + p.phase / TAU).fract();
                Hsl::new(mix_hue(p.base_hue, p.secondary_hue, t), sat, 0.35 + 0.3 * t)
            }
            PatternKind::RingedRadial => {
                let d = (u - 0.5).hypot(v - 0.5) * 2.0;
                let ring = (d * freq * PI + p.phase).cos();
                let hue = mix_hue(p.base_hue, p.secondary_hue, (d / SQRT_2).min(1.0));
                Hsl::new(hue, sat * (1.0 - 0.2 * d.min(1.0)), 0.5 + 0.18 * ring)
            }
            PatternKind::DiamondBands => {
                let d = (u - 0.5).abs() + (v - 0.5).abs();
                let band = (d * freq + p.phase / TAU).fract();
                let hue = if band < 0.5 { p.base_hue } else { p.tertiary_hue };
                Hsl::new(hue, sat, 0.35 + 0.3 * (band * 2.0 - 1.0).abs())
            }
            PatternKind::GridCells => {
                let (cx, fx) = split(u * freq);
                let (cy, fy) = split(v * freq);
                let cell = cx + cy;
                let hue = p.base_hue + cell * 23.0;
                let sat = if (cell as i64) % 2 == 0 { sat } else { sat * 0.75 };
                Hsl::new(hue, sat, 0.3 + 0.35 * (fx + fy) / 2.0)
            }
            PatternKind::SpiralRadial => {
                let (dx, dy) = (u - 0.5, v - 0.5);
                let angle = dy.atan2(dx);
                let r = dx.hypot(dy) * 2.0;
                let swirl = (angle * 3.0 + r * freq * TAU + p.phase).sin();
                let hue = p.base_hue + angle.to_degrees() * 0.5 + 40.0 * swirl;
                Hsl::new(hue, sat, 0.45 + 0.2 * swirl)
            }
            PatternKind::HardDiagonalStripes => {
                let stripe = ((u - v + 1.0) * freq).floor() as i64;
                if stripe.rem_euclid(2) == 0 {
                    Hsl::new(p.base_hue, sat, 0.55)
                } else {
                    Hsl::new(p.tertiary_hue, sat, 0.3)
                }
            }
            PatternKind::TriHueBlend => {
                let hue = blend_hues(&[
                    (p.base_hue, 1.0 - u),
                    (p.secondary_hue, u * (1.0 - v)),
                    (p.tertiary_hue, u * v),
                ]);
                let lightness = 0.5 + 0.12 * ((u + v) * freq * PI + p.phase).sin();
                Hsl::new(hue, sat, lightness)
            }
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer and fractional parts of a non-negative coordinate.
fn split(x: f64) -> (f64, f64) {
    let whole = x.floor();
    (whole, x - whole)
}

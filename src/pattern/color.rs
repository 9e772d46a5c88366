//! HSL color handling for the pattern renderer.

/// A color in HSL space.
///
/// `hue` is in degrees and may lie outside `[0, 360)`; it is wrapped on
/// conversion. `saturation` and `lightness` are fractions and are clamped
/// to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert to 8-bit sRGB.
    ///
    /// Uses the closed form `f(n) = l - a * clamp(min(k - 3, 9 - k, 1), -1, 1)`
    /// with `k = (n + h / 30) mod 12` and `a = s * min(l, 1 - l)`.
    pub fn to_rgb(self) -> [u8; 3] {
        let h = wrap_hue(self.hue);
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);
        let a = s * l.min(1.0 - l);

        let channel = |n: f64| {
            let k = (n + h / 30.0) % 12.0;
            l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
        };

        [
            to_channel(channel(0.0)),
            to_channel(channel(8.0)),
            to_channel(channel(4.0)),
        ]
    }
}

/// Wrap a hue in degrees into `[0, 360)`.
pub fn wrap_hue(hue: f64) -> f64 {
    hue.rem_euclid(360.0)
}

/// Interpolate between two hues along the shorter arc.
pub fn mix_hue(from: f64, to: f64, t: f64) -> f64 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    wrap_hue(from + delta * t)
}

/// Weighted circular mean of hues. Weights need not be normalized.
pub fn blend_hues(hues: &[(f64, f64)]) -> f64 {
    let (x, y) = hues.iter().fold((0.0, 0.0), |(x, y), &(hue, weight)| {
        let rad = hue.to_radians();
        (x + weight * rad.cos(), y + weight * rad.sin())
    });
    wrap_hue(y.atan2(x).to_degrees())
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

//! Time-varying color ramp used to tint hit points.

use crate::{
    Real, modulo,
    vec::{Color3, mix},
};

/// Step budget the darkening is normalized against
pub const STEP_NORMALIZER: Real = 256.0;
/// Fraction of the color removed when a pixel used the whole step budget.
/// Hits are also scaled by the shader's occlusion term `1 - 0.8 * steps / 256`,
/// so halving here leaves 10% of the hue on the costliest hits instead of black.
pub const STEP_DARKENING: Real = 0.5;
/// How fast the ramp scrolls, in ramp units per second
pub const TIME_SCROLL: Real = 0.5;

/// Key colors, evenly spaced over `[0, 1]`: deep blue, cyan, orange, magenta.
pub const KEY_COLORS: [[Real; 3]; 4] = [
    [0.10, 0.20, 0.60],
    [0.20, 0.70, 0.80],
    [0.95, 0.55, 0.20],
    [0.90, 0.20, 0.45],
];

fn key(i: usize) -> Color3 {
    Color3::from(KEY_COLORS[i])
}

/// Undarkened ramp value at `x` in `[0, 1]`.
#[must_use]
pub fn ramp(x: Real) -> Color3 {
    let s = (x * 3.0).clamp(0.0, 3.0);
    if s < 1.0 {
        mix(key(0), key(1), s)
    } else if s < 2.0 {
        mix(key(1), key(2), s - 1.0)
    } else {
        mix(key(2), key(3), s - 2.0)
    }
}

/// Color for ramp parameter `t`, scrolled by `time` and darkened by the
/// number of marching steps the pixel needed.
///
/// The ramp wraps from the last key color back to the first, so the output
/// jumps where `t + time * 0.5` crosses an integer.
#[must_use]
pub fn palette(t: Real, steps: u32, time: Real) -> Color3 {
    let x = modulo(TIME_SCROLL.mul_add(time, t), 1.0);
    let darkening = (steps as Real / STEP_NORMALIZER).clamp(0.0, 1.0);
    ramp(x) * STEP_DARKENING.mul_add(-darkening, 1.0)
}

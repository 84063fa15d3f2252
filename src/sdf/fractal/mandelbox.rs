use cgmath::{EuclideanSpace, InnerSpace};

use crate::{
    Real,
    vec::{Point3, clamp},
};

use super::{FractalInputs, length};

pub const ITERATION_CAP: u32 = 20;
pub const BAILOUT: Real = 4.0;
const MIN_RADIUS2: Real = 0.25;
const FIXED_RADIUS2: Real = 1.0;

/// Box scale, oscillating around -2.5.
#[must_use]
pub fn box_scale(time: Real) -> Real {
    0.5f32.mul_add((0.1 * time).sin(), -2.5)
}

/// Mandelbox: box fold, sphere fold, then `p <- scale * p + pos`.
#[must_use]
pub fn distance(pos: Point3, inputs: &FractalInputs) -> Real {
    let offset = pos.to_vec();
    let scale = box_scale(inputs.time);
    let mut p = offset;
    let mut dr: Real = 1.0;

    for _ in 0..inputs.capped_iterations(ITERATION_CAP) {
        p = clamp(p, -1.0, 1.0) * 2.0 - p;

        let r2 = p.magnitude2();
        if r2 < MIN_RADIUS2 {
            let k = FIXED_RADIUS2 / MIN_RADIUS2;
            p *= k;
            dr *= k;
        } else if r2 < FIXED_RADIUS2 {
            let k = FIXED_RADIUS2 / r2;
            p *= k;
            dr *= k;
        }

        p = p * scale + offset;
        dr = dr.mul_add(scale.abs(), 1.0);

        if length(p) > BAILOUT {
            break;
        }
    }

    // dr >= 1 after the first iteration, so the division is always defined.
    length(p) / dr.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_oscillates_around_minus_two_and_a_half() {
        assert!((box_scale(0.0) + 2.5).abs() < 1e-6);
        for i in 0..50 {
            let s = box_scale(i as Real);
            assert!((-3.0..=-2.0).contains(&s), "{s}");
        }
    }

    #[test]
    fn origin_is_a_fixed_point() {
        let d = distance(Point3::origin(), &FractalInputs::default());
        assert!(d.abs() < 1e-6, "{d}");
    }

    #[test]
    fn far_point_escapes_quickly() {
        let d = distance(Point3::new(0.0, 0.0, -3.0), &FractalInputs::default());
        assert!(d > 0.5, "{d}");
    }
}

use cgmath::{EuclideanSpace, InnerSpace};

use crate::{
    Real,
    constants::MIN_RADIUS,
    vec::{Point3, Vec3},
};

use super::{FractalInputs, finite_or_zero, length};

pub const ITERATION_CAP: u32 = 12;
/// Shift applied to points in the outer inversion shell
pub const SHELL_SHIFT: Real = 0.5;

/// Apollonian-style packing: octant fold, sphere inversion inside the unit
/// ball, a translation in the shell `1 <= r^2 < 2`, then a uniform scale by
/// `power / 2`.
///
/// Inversion and scaling move `|p|` and the accumulated scale together, so
/// only the shell translations change the estimate. It is unsigned and never
/// reports a point inside.
#[must_use]
pub fn distance(pos: Point3, inputs: &FractalInputs) -> Real {
    let zoom = inputs.power * 0.5;
    let mut p = pos.to_vec();
    let mut scale: Real = 1.0;

    for _ in 0..inputs.capped_iterations(ITERATION_CAP) {
        p = crate::vec::abs(p);

        let r2 = p.magnitude2();
        if r2 < 1.0 {
            let k = 1.0 / r2.max(MIN_RADIUS);
            p *= k;
            scale *= k;
        } else if r2 < 2.0 {
            p -= Vec3::new(SHELL_SHIFT, SHELL_SHIFT, SHELL_SHIFT);
        }

        p *= zoom;
        scale *= zoom;
    }

    finite_or_zero(length(p) / scale.abs().max(MIN_RADIUS))
}

use cgmath::{EuclideanSpace, InnerSpace};

use crate::{
    Real,
    vec::{Point3, Vec3},
};

use super::{FractalInputs, finite_or_zero, length, sort_descending};

pub const ITERATION_CAP: u32 = 20;
/// Radius of the orbit-trap shell subtracted from the final point
pub const SHELL_RADIUS: Real = 0.1;

/// Fold factor, breathing slowly around 2.
#[must_use]
pub fn fold_factor(time: Real) -> Real {
    0.5f32.mul_add((0.2 * time).sin(), 2.0)
}

fn shear(p: Vec3) -> Vec3 {
    Vec3::new(
        0.1f32.mul_add(p.y, p.x) - 0.2,
        0.1f32.mul_add(p.z, p.y) + 0.1,
        p.z,
    )
}

/// Kleinian-style limit set: octant fold, time-modulated affine remap,
/// two-tier sphere scaling and a fixed shear per iteration.
#[must_use]
pub fn distance(pos: Point3, inputs: &FractalInputs) -> Real {
    let k = fold_factor(inputs.time);
    let mut p = pos.to_vec();
    let mut scale = 1.0;

    for _ in 0..inputs.capped_iterations(ITERATION_CAP) {
        p = sort_descending(crate::vec::abs(p));
        p = p * k - Vec3::new(1.0, 1.0, 1.0) * (k - 1.0);
        scale *= k;

        let r = p.magnitude();
        if r < 0.5 {
            p *= 4.0;
            scale *= 4.0;
        } else if r < 1.0 {
            p *= 2.0;
            scale *= 2.0;
        }

        p = shear(p);
    }

    finite_or_zero((length(p) - SHELL_RADIUS) / scale)
}

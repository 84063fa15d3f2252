use cgmath::EuclideanSpace;

use crate::{
    Real,
    constants::MIN_RADIUS,
    vec::{Point3, Vec3},
};

use super::{FractalInputs, escape_time_distance, length, spherical_power};

pub const ITERATION_CAP: u32 = 256;
pub const BAILOUT: Real = 4.0;

/// Julia constant for a given time; each axis drifts at its own rate.
#[must_use]
pub fn julia_constant(time: Real) -> Vec3 {
    Vec3::new(
        0.45 * (0.3 * time).cos(),
        0.45 * 0.5f32.mul_add(time, 1.0).sin(),
        0.35 * 0.7f32.mul_add(time, 2.0).sin(),
    )
}

/// Same recurrence as the Mandelbulb, but the added constant orbits with
/// time and the derivative carries no `+ 1` term.
#[must_use]
pub fn distance(pos: Point3, inputs: &FractalInputs) -> Real {
    let c = julia_constant(inputs.time);
    let power = inputs.power;
    let mut z = pos.to_vec();
    let mut dr = 1.0;
    let mut r = 0.0;

    for _ in 0..inputs.capped_iterations(ITERATION_CAP) {
        r = length(z);
        if r > BAILOUT || r <= MIN_RADIUS {
            break;
        }

        dr *= r.powf(power - 1.0) * power;
        z = spherical_power(z, r, power) + c;
    }

    escape_time_distance(r, dr)
}

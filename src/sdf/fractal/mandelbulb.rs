use cgmath::EuclideanSpace;

use crate::{Real, constants::MIN_RADIUS, vec::Point3};

use super::{FractalInputs, escape_time_distance, length, spherical_power};

pub const ITERATION_CAP: u32 = 256;
pub const BAILOUT: Real = 4.0;

/// Power-n Mandelbulb: `z <- z^n + pos` with the running derivative
/// `dr <- n * r^(n-1) * dr + 1`.
#[must_use]
pub fn distance(pos: Point3, inputs: &FractalInputs) -> Real {
    let c = pos.to_vec();
    let power = inputs.power;
    let mut z = c;
    let mut dr = 1.0;
    let mut r = 0.0;

    for _ in 0..inputs.capped_iterations(ITERATION_CAP) {
        r = length(z);
        if r > BAILOUT || r <= MIN_RADIUS {
            break;
        }

        dr = (r.powf(power - 1.0) * power).mul_add(dr, 1.0);
        z = spherical_power(z, r, power) + c;
    }

    escape_time_distance(r, dr)
}

use cgmath::EuclideanSpace;

use crate::{Real, vec::Point3};

use super::{FractalInputs, sort_descending};

/// Fold count, fixed whatever iteration count is requested
pub const FOLDS: u32 = 5;

/// Menger sponge carved by folding space onto one canonical sub-cube per level.
///
/// Each fold mirrors the point into the octant `x >= y >= z >= 0`, removes the
/// cross-shaped tunnel of the current level (the point is inside it when the
/// middle coordinate is below 1/3) and then zooms into the sub-cube nearest
/// to the point.
#[must_use]
pub fn distance(pos: Point3, _inputs: &FractalInputs) -> Real {
    let mut p = pos.to_vec();
    let mut d = p.x.abs().max(p.y.abs()).max(p.z.abs()) - 1.0;
    let mut scale = 1.0;

    for _ in 0..FOLDS {
        p = sort_descending(crate::vec::abs(p));
        d = d.max((1.0 / 3.0 - p.y) / scale);

        p.x = p.x.mul_add(3.0, -2.0);
        p.y = p.y.mul_add(3.0, -2.0);
        p.z *= 3.0;
        // z lies in the outer third: recenter on that sub-cube
        if p.z > 1.0 {
            p.z -= 2.0;
        }
        scale *= 3.0;
    }

    d
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Box terms folded in with `min`, wrapping z below -1.
    fn min_of_box_terms(pos: Point3) -> Real {
        let mut p = pos.to_vec();
        let mut d = Real::MAX;
        let mut scale = 1.0;
        for _ in 0..FOLDS {
            p = sort_descending(crate::vec::abs(p));
            p.x = p.x.mul_add(3.0, -2.0);
            p.y = p.y.mul_add(3.0, -2.0);
            p.z *= 3.0;
            if p.z < -1.0 {
                p.z += 2.0;
            }
            d = d.min((p.x.max(p.y) - 1.0) / (scale * 3.0));
            scale *= 3.0;
        }
        d
    }

    #[test]
    fn min_of_box_terms_is_negative_in_the_central_tunnel() {
        // The tunnel through the origin is empty, yet the min form puts it inside
        let origin = Point3::new(0.0, 0.0, 0.0);
        assert!((min_of_box_terms(origin) + 1.0).abs() < 1e-6);
        assert!(distance(origin, &FractalInputs::default()) >= 0.0);
    }

    #[test]
    fn center_of_the_tunnel_is_outside() {
        let d = distance(Point3::new(0.0, 0.0, 0.0), &FractalInputs::default());
        assert!((d - 1.0 / 3.0).abs() < 1e-5, "{d}");
    }

    #[test]
    fn corner_cube_is_solid() {
        // Near the outer corner, the sub-cubes survive every level.
        let d = distance(Point3::new(0.98, 0.98, 0.98), &FractalInputs::default());
        assert!(d < 0.0, "{d}");
    }

    #[test]
    fn outside_the_bounding_cube() {
        let d = distance(Point3::new(0.0, 0.0, -3.0), &FractalInputs::default());
        assert!((d - 2.0).abs() < 1e-5, "{d}");
    }

    #[test]
    fn ignores_iterations_and_power() {
        let p = Point3::new(0.2, 0.7, -0.4);
        let a = FractalInputs::default();
        let b = FractalInputs {
            power: 2.0,
            iterations: 8,
            time: 30.0,
        };
        assert_eq!(distance(p, &a).to_bits(), distance(p, &b).to_bits());
    }
}

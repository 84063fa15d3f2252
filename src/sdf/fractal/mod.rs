//! Distance estimators for the six fractal families and the table that
//! dispatches between them.
//!
//! Every estimator is a plain function of the sample point and the frame's
//! [`FractalInputs`]; nothing is read from shared state, so any number of
//! pixels can evaluate them concurrently.

use cgmath::InnerSpace;

use crate::{
    Real,
    constants::{AUTO_CYCLE, MIN_RADIUS},
    params::ParameterBlock,
    vec::{Point3, Vec3},
};

use super::sdf_object::SDFObject;

pub mod apollonian;
pub mod julia;
pub mod kleinian;
pub mod mandelbox;
pub mod mandelbulb;
pub mod menger;

/// Seconds spent on each family when auto-cycling (`1 / 0.08`)
pub const AUTO_CYCLE_PERIOD: Real = 12.5;

/// Subset of the [`ParameterBlock`] that the estimators read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalInputs {
    pub power: Real,
    /// Requested iteration count, before the per-family cap
    pub iterations: u32,
    pub time: Real,
}

impl FractalInputs {
    /// Requested iterations bounded by `cap`
    #[must_use]
    pub fn capped_iterations(&self, cap: u32) -> u32 {
        self.iterations.min(cap)
    }
}

impl Default for FractalInputs {
    fn default() -> Self {
        Self {
            power: 8.0,
            iterations: 64,
            time: 0.0,
        }
    }
}

pub type EstimatorFn = fn(Point3, &FractalInputs) -> Real;

/// One row of the dispatch table.
pub struct FamilyEntry {
    pub family: FractalFamily,
    pub name: &'static str,
    /// Upper bound on the iterations an estimator performs, whatever is requested
    pub iteration_cap: u32,
    pub estimator: EstimatorFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractalFamily {
    Mandelbulb,
    Julia,
    Menger,
    Kleinian,
    Apollonian,
    Mandelbox,
}

/// Indexed by `FractalFamily as usize`.
pub static FAMILY_TABLE: [FamilyEntry; 6] = [
    FamilyEntry {
        family: FractalFamily::Mandelbulb,
        name: "Mandelbulb",
        iteration_cap: mandelbulb::ITERATION_CAP,
        estimator: mandelbulb::distance,
    },
    FamilyEntry {
        family: FractalFamily::Julia,
        name: "Julia Set",
        iteration_cap: julia::ITERATION_CAP,
        estimator: julia::distance,
    },
    FamilyEntry {
        family: FractalFamily::Menger,
        name: "Menger Sponge",
        iteration_cap: menger::FOLDS,
        estimator: menger::distance,
    },
    FamilyEntry {
        family: FractalFamily::Kleinian,
        name: "Kleinian",
        iteration_cap: kleinian::ITERATION_CAP,
        estimator: kleinian::distance,
    },
    FamilyEntry {
        family: FractalFamily::Apollonian,
        name: "Apollonian",
        iteration_cap: apollonian::ITERATION_CAP,
        estimator: apollonian::distance,
    },
    FamilyEntry {
        family: FractalFamily::Mandelbox,
        name: "Mandelbox",
        iteration_cap: mandelbox::ITERATION_CAP,
        estimator: mandelbox::distance,
    },
];

impl FractalFamily {
    pub const ALL: [Self; 6] = [
        Self::Mandelbulb,
        Self::Julia,
        Self::Menger,
        Self::Kleinian,
        Self::Apollonian,
        Self::Mandelbox,
    ];

    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// Family for an arbitrary index, wrapped into `0..6`
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self::ALL[(index % 6) as usize]
    }

    /// Active family for a frame: explicit index, or the auto-cycle when
    /// `fractal_type` is [`AUTO_CYCLE`].
    #[must_use]
    pub fn select(fractal_type: u32, time: Real) -> Self {
        if fractal_type == AUTO_CYCLE {
            // Dividing by the period keeps exact boundaries (87.5 s -> 7) exact.
            let slot = (time / AUTO_CYCLE_PERIOD).floor() as i64;
            Self::ALL[slot.rem_euclid(6) as usize]
        } else {
            Self::from_index(fractal_type)
        }
    }

    /// Parse a family name as written in scene files (`"menger"`, `"mandelbox"`, ...)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "mandelbulb" => Some(Self::Mandelbulb),
            "julia" | "julia set" => Some(Self::Julia),
            "menger" | "menger sponge" => Some(Self::Menger),
            "kleinian" => Some(Self::Kleinian),
            "apollonian" => Some(Self::Apollonian),
            "mandelbox" => Some(Self::Mandelbox),
            _ => None,
        }
    }

    #[must_use]
    pub fn entry(self) -> &'static FamilyEntry {
        &FAMILY_TABLE[self as usize]
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    #[must_use]
    pub fn iteration_cap(self) -> u32 {
        self.entry().iteration_cap
    }

    /// Evaluate this family's distance estimator at `p`
    #[must_use]
    pub fn distance(self, p: Point3, inputs: &FractalInputs) -> Real {
        (self.entry().estimator)(p, inputs)
    }
}

/// The fractal selected for one frame, ready to be marched.
#[derive(Debug, Clone, Copy)]
pub struct FractalScene {
    pub family: FractalFamily,
    pub inputs: FractalInputs,
}

impl FractalScene {
    #[must_use]
    pub const fn new(family: FractalFamily, inputs: FractalInputs) -> Self {
        Self { family, inputs }
    }

    #[must_use]
    pub fn from_parameters(params: &ParameterBlock) -> Self {
        Self::new(params.active_family(), params.fractal_inputs())
    }
}

impl SDFObject for FractalScene {
    fn signed_distance(&self, world_p: Point3) -> Real {
        self.family.distance(world_p, &self.inputs)
    }
}

/// `0.5 * ln(r) * r / dr`, reporting 0 when the radius or derivative has
/// collapsed (the point sits on a fixed point of the iteration).
pub(crate) fn escape_time_distance(r: Real, dr: Real) -> Real {
    if r <= MIN_RADIUS || dr.abs() <= MIN_RADIUS {
        return 0.0;
    }
    finite_or_zero(0.5 * r.ln() * r / dr)
}

pub(crate) fn finite_or_zero(d: Real) -> Real {
    if d.is_finite() { d } else { 0.0 }
}

/// Raise `z` (with length `r`) to `power` in spherical coordinates.
pub(crate) fn spherical_power(z: Vec3, r: Real, power: Real) -> Vec3 {
    let theta = (z.z / r).clamp(-1.0, 1.0).acos() * power;
    let phi = z.y.atan2(z.x) * power;
    let zr = r.powf(power);
    let sin_theta = theta.sin();
    Vec3::new(
        zr * sin_theta * phi.cos(),
        zr * sin_theta * phi.sin(),
        zr * theta.cos(),
    )
}

/// Order the components so that `x >= y >= z` (three compare-and-swaps).
pub(crate) fn sort_descending(mut p: Vec3) -> Vec3 {
    if p.x < p.y {
        std::mem::swap(&mut p.x, &mut p.y);
    }
    if p.x < p.z {
        std::mem::swap(&mut p.x, &mut p.z);
    }
    if p.y < p.z {
        std::mem::swap(&mut p.y, &mut p.z);
    }
    p
}

pub(crate) fn length(p: Vec3) -> Real {
    p.magnitude()
}

#[cfg(test)]
mod tests {
    use cgmath::EuclideanSpace;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn table_rows_match_their_index() {
        for (i, entry) in FAMILY_TABLE.iter().enumerate() {
            assert_eq!(entry.family.index() as usize, i);
            assert_eq!(FractalFamily::from_index(i as u32), entry.family);
        }
    }

    #[test]
    fn explicit_selection_ignores_time() {
        for time in [0.0, 3.3, 12.5, 87.5, 1.0e4] {
            assert_eq!(FractalFamily::select(2, time), FractalFamily::Menger);
        }
        assert_eq!(FractalFamily::select(8, 0.0), FractalFamily::Menger);
        assert_eq!(FractalFamily::select(5, 40.0), FractalFamily::Mandelbox);
    }

    #[test]
    fn auto_cycle_boundaries() {
        assert_eq!(FractalFamily::select(AUTO_CYCLE, 0.0), FractalFamily::Mandelbulb);
        assert_eq!(FractalFamily::select(AUTO_CYCLE, 12.49), FractalFamily::Mandelbulb);
        assert_eq!(FractalFamily::select(AUTO_CYCLE, 12.5), FractalFamily::Julia);
        assert_eq!(FractalFamily::select(AUTO_CYCLE, 87.5), FractalFamily::Julia);
        assert_eq!(FractalFamily::select(AUTO_CYCLE, 75.0), FractalFamily::Mandelbulb);
        assert_eq!(FractalFamily::select(AUTO_CYCLE, 74.9), FractalFamily::Mandelbox);
    }

    #[test]
    fn selection_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let time: Real = rng.random_range(0.0..500.0);
            let fractal_type = if rng.random_bool(0.5) { AUTO_CYCLE } else { rng.random_range(0..12) };
            assert_eq!(
                FractalFamily::select(fractal_type, time),
                FractalFamily::select(fractal_type, time)
            );
        }
    }

    #[test]
    fn names_parse_back() {
        for family in FractalFamily::ALL {
            assert_eq!(FractalFamily::from_name(family.name()), Some(family));
        }
        assert_eq!(FractalFamily::from_name(" Mandelbox "), Some(FractalFamily::Mandelbox));
        assert_eq!(FractalFamily::from_name("sierpinski"), None);
    }

    #[test]
    fn every_family_is_finite_and_non_negative_at_origin() {
        let origin = Point3::origin();
        for family in FractalFamily::ALL {
            for power in [1.0, 1.5, 2.0, 3.0, 8.0, 12.0, 20.0] {
                for iterations in [8, 16, 64, 256] {
                    for time in [0.0, 1.0, 3.7, 12.5, 100.0] {
                        let inputs = FractalInputs {
                            power,
                            iterations,
                            time,
                        };
                        let d = family.distance(origin, &inputs);
                        assert!(
                            d.is_finite() && d >= 0.0,
                            "{family:?} power={power} iterations={iterations} time={time}: {d}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn random_samples_never_produce_nan() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for family in FractalFamily::ALL {
            for _ in 0..500 {
                let p = Point3::new(
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                );
                let inputs = FractalInputs {
                    power: rng.random_range(1.0..20.0),
                    iterations: rng.random_range(8..=256),
                    time: rng.random_range(0.0..200.0),
                };
                let d = family.distance(p, &inputs);
                assert!(d.is_finite(), "{family:?} at {p:?} with {inputs:?}: {d}");
            }
        }
    }

    /// Seeded sample points in the cube `[-half, half]^3`
    fn sample_points(seed: u64, half: Real, count: usize) -> Vec<Point3> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                Point3::new(
                    rng.random_range(-half..half),
                    rng.random_range(-half..half),
                    rng.random_range(-half..half),
                )
            })
            .collect()
    }

    #[test]
    fn caps_bound_requested_iterations() {
        // Regions and powers where a fair share of orbits stay bounded up to the cap
        let cases = [
            (FractalFamily::Mandelbulb, 8.0, 1.2),
            (FractalFamily::Julia, 8.0, 1.2),
            (FractalFamily::Kleinian, 8.0, 1.5),
            (FractalFamily::Apollonian, 1.5, 1.5),
            (FractalFamily::Mandelbox, 8.0, 0.3),
        ];
        for (family, power, half) in cases {
            let cap = family.iteration_cap();
            let with = |iterations| FractalInputs {
                power,
                iterations,
                time: 0.0,
            };
            let mut reached_cap = 0;
            for p in sample_points(11, half, 500) {
                let at_cap = family.distance(p, &with(cap));
                assert_eq!(
                    at_cap.to_bits(),
                    family.distance(p, &with(1000)).to_bits(),
                    "{family:?} at {p:?}"
                );
                if at_cap.to_bits() != family.distance(p, &with(cap - 1)).to_bits() {
                    reached_cap += 1;
                }
            }
            // The last capped iteration must still change some estimates
            if matches!(
                family,
                FractalFamily::Kleinian | FractalFamily::Apollonian | FractalFamily::Mandelbox
            ) {
                assert!(reached_cap > 0, "{family:?} never ran up to its cap");
            }
        }
        assert_eq!(FractalFamily::Kleinian.iteration_cap(), 20);
        assert_eq!(FractalFamily::Apollonian.iteration_cap(), 12);
        assert_eq!(FractalFamily::Mandelbox.iteration_cap(), 20);
    }

    #[test]
    fn sort_descending_orders_all_permutations() {
        let perms = [
            (1.0, 2.0, 3.0),
            (1.0, 3.0, 2.0),
            (2.0, 1.0, 3.0),
            (2.0, 3.0, 1.0),
            (3.0, 1.0, 2.0),
            (3.0, 2.0, 1.0),
        ];
        for (x, y, z) in perms {
            assert_eq!(sort_descending(Vec3::new(x, y, z)), Vec3::new(3.0, 2.0, 1.0));
        }
    }

    #[test]
    fn degenerate_radius_reports_zero() {
        assert!(escape_time_distance(0.0, 1.0).abs() < Real::EPSILON);
        assert!(escape_time_distance(2.0, 0.0).abs() < Real::EPSILON);
        assert!(escape_time_distance(2.0, Real::INFINITY).abs() < Real::EPSILON);
    }
}

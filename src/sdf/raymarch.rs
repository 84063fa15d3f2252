use cgmath::InnerSpace;

use crate::{
    Real,
    ray::Ray,
    vec::{Point3, Vec3},
};

use super::sdf_object::SDFObject;

/// Parameters that control ray marching behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaymarchSettings {
    /// Hard cap on the number of sphere-tracing steps.
    pub max_steps: u32,
    /// Distance past which the ray is considered to have escaped.
    pub max_distance: Real,
    /// Threshold at which we consider the surface "hit".
    pub surface_threshold: Real,
    /// Offset used by the central differences of the normal estimation.
    pub normal_epsilon: Real,
}

impl Default for RaymarchSettings {
    fn default() -> Self {
        Self {
            max_steps: 256,
            max_distance: 100.0,
            surface_threshold: 0.001,
            normal_epsilon: 0.001,
        }
    }
}

/// Status of the marching attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaymarchStatus {
    /// Surface detected under the threshold.
    Hit,
    /// Travelled past `max_distance`.
    Escaped,
    /// Step budget exhausted (or the estimator returned a non-finite value).
    Exhausted,
}

/// Outcome of one ray. Misses carry `depth == -1` and `steps == max_steps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaymarchResult {
    pub status: RaymarchStatus,
    pub depth: Real,
    pub steps: u32,
}

impl RaymarchResult {
    pub const MISS_DEPTH: Real = -1.0;

    #[must_use]
    pub const fn hit(depth: Real, steps: u32) -> Self {
        Self {
            status: RaymarchStatus::Hit,
            depth,
            steps,
        }
    }

    #[must_use]
    pub const fn miss(status: RaymarchStatus, settings: &RaymarchSettings) -> Self {
        Self {
            status,
            depth: Self::MISS_DEPTH,
            steps: settings.max_steps,
        }
    }

    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self.status, RaymarchStatus::Hit)
    }

    /// Fraction of the step budget consumed, in `[0, 1]`
    #[must_use]
    pub fn step_ratio(&self, settings: &RaymarchSettings) -> Real {
        self.steps as Real / settings.max_steps.max(1) as Real
    }
}

/// Sphere-trace `sdf_obj` along `ray`, starting at the ray origin.
#[must_use]
pub fn raymarch(ray: &Ray, sdf_obj: &dyn SDFObject, settings: &RaymarchSettings) -> RaymarchResult {
    let mut depth = 0.0;

    for step in 0..settings.max_steps {
        let distance = sdf_obj.signed_distance(ray.point_at(depth));

        if !distance.is_finite() {
            return RaymarchResult::miss(RaymarchStatus::Exhausted, settings);
        }

        if distance < settings.surface_threshold {
            return RaymarchResult::hit(depth, step);
        }

        depth += distance;
        if depth > settings.max_distance {
            return RaymarchResult::miss(RaymarchStatus::Escaped, settings);
        }
    }

    RaymarchResult::miss(RaymarchStatus::Exhausted, settings)
}

/// Estimate the normal direction using central differences on the SDF.
#[must_use]
pub fn compute_normal(world_p: Point3, sdf_obj: &dyn SDFObject, eps: Real) -> Vec3 {
    let epsilon = if eps > 0.0 { eps } else { 1.0e-3 };
    let offset_x = Vec3::new(epsilon, 0.0, 0.0);
    let offset_y = Vec3::new(0.0, epsilon, 0.0);
    let offset_z = Vec3::new(0.0, 0.0, epsilon);

    let dx =
        sdf_obj.signed_distance(world_p + offset_x) - sdf_obj.signed_distance(world_p - offset_x);
    let dy =
        sdf_obj.signed_distance(world_p + offset_y) - sdf_obj.signed_distance(world_p - offset_y);
    let dz =
        sdf_obj.signed_distance(world_p + offset_z) - sdf_obj.signed_distance(world_p - offset_z);

    let gradient = Vec3::new(dx, dy, dz);
    let length2 = gradient.magnitude2();
    if length2.is_nan() || length2 <= Real::EPSILON * Real::EPSILON {
        Vec3::unit_y()
    } else {
        gradient.normalize()
    }
}

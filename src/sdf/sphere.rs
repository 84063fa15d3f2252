use cgmath::{EuclideanSpace, MetricSpace};

use crate::{Real, vec::Point3};

use super::sdf_object::SDFObject;

/// Exact signed-distance sphere.
pub struct SdfSphere {
    center: Point3,
    radius: Real,
}

impl SdfSphere {
    #[must_use]
    pub const fn new(center: Point3, radius: Real) -> Self {
        Self { center, radius }
    }

    /// Unit sphere centered on the origin
    #[must_use]
    pub fn unit() -> Self {
        Self::new(Point3::origin(), 1.0)
    }
}

impl SDFObject for SdfSphere {
    fn signed_distance(&self, world_p: Point3) -> Real {
        world_p.distance(self.center) - self.radius
    }
}

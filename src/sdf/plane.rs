use cgmath::{EuclideanSpace, InnerSpace};

use crate::{
    Real,
    vec::{Point3, Vec3},
};

use super::sdf_object::SDFObject;

/// Infinite plane `dot(n, p) = offset`.
pub struct SdfPlane {
    normal: Vec3,
    offset: Real,
}

impl SdfPlane {
    #[must_use]
    pub fn new(normal: Vec3, offset: Real) -> Self {
        let normal = if normal.magnitude2() <= Real::EPSILON {
            Vec3::unit_y()
        } else {
            normal.normalize()
        };
        Self { normal, offset }
    }
}

impl SDFObject for SdfPlane {
    fn signed_distance(&self, world_p: Point3) -> Real {
        world_p.to_vec().dot(self.normal) - self.offset
    }
}

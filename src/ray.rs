use crate::{
    Real,
    vec::{Point3, Vec3},
};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// ray origin
    pub o: Point3,
    /// ray direction (unit length)
    pub d: Vec3,
}

impl Ray {
    #[must_use]
    pub const fn new(origin: &Point3, direction: &Vec3) -> Self {
        Self {
            o: *origin,
            d: *direction,
        }
    }

    #[must_use]
    pub fn point_at(&self, t: Real) -> Point3 {
        self.o + t * self.d
    }
}

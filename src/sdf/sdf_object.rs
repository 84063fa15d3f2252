use crate::{Real, vec::Point3};

/// Trait implemented by implicit surfaces that expose a distance estimate.
///
/// The estimate does not need to be exact, but it must never overestimate the
/// distance to the surface or sphere tracing may step through it.
pub trait SDFObject: Send + Sync {
    /// Evaluate the (signed) distance at a world-space point.
    fn signed_distance(&self, world_p: Point3) -> Real;
}

pub mod fractal;
pub mod plane;
pub mod raymarch;
pub mod sdf_object;
pub mod sphere;

pub use fractal::{FractalFamily, FractalInputs, FractalScene};
pub use plane::SdfPlane;
pub use raymarch::{
    RaymarchResult, RaymarchSettings, RaymarchStatus, compute_normal, raymarch,
};
pub use sdf_object::SDFObject;
pub use sphere::SdfSphere;

use tinyjson::JsonValue;

#[macro_use]
extern crate quick_error;

/// Scalar type used by the whole renderer (single precision, as on the GPU)
pub type Real = f32;

pub mod constants {
    use crate::Real;
    /// Smallest radius considered non-degenerate by the distance estimators
    pub const MIN_RADIUS: Real = 1.0e-6;
    /// `fractal_type` value that enables time-driven switching between families
    pub const AUTO_CYCLE: u32 = 99;
}

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        /// InvalidType
        InvalidType(name: String) {
            display("Unknown reference (name: {:?})", name)
        }
        /// Uncovered case
        UncoveredCaseJson(name: &'static str, json: JsonValue) {
            display("Impossible to construct {}, JSON object case non unhandled {:?}", name, json)
        }
        /// Wrong dimension
        WrongDimensionJson(name: &'static str, json: Vec<JsonValue>, dim_expected: usize) {
            display("Impossible to construct {}, Wrong dimension provided (expected: {}, got {}) {:?}", name, dim_expected, json.len(), json)
        }
        /// Fuse two json failed
        FailedPatchJson(json: JsonValue, target: JsonValue) {
            display("Impossible to patch this JSON part {:?} to this one {:?}", json, target)
        }
        /// Fractal family name or index not recognised
        UnknownFractal(name: String) {
            display("Unknown fractal family {:?}", name)
        }
        /// Other error
        Other(err: Box<dyn std::error::Error>) {
            source(&**err)
        }
    }
}
pub type Result<T> = std::result::Result<T, Error>;

/// Modulo function, always return a positive number
/// a: number to modulo
/// b: modulo value
/// Return a modulo b
#[must_use]
pub fn modulo(a: Real, b: Real) -> Real {
    let r = a % b;
    if r < 0.0 { r + b } else { r }
}

pub mod array2d;
pub mod camera;
pub mod image;
pub mod json;
pub mod palette;
pub mod params;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod sdf;
pub mod shader;
pub mod vec;

use bytemuck::{Pod, Zeroable};
use cgmath::SquareMatrix;

use crate::{
    Real,
    constants::AUTO_CYCLE,
    sdf::{FractalFamily, FractalInputs},
    vec::{Mat4, Point3},
};

/// Host-side range of `fractal_power`
pub const POWER_RANGE: (Real, Real) = (1.0, 20.0);
/// Host-side range of `fractal_iterations`
pub const ITERATION_RANGE: (u32, u32) = (8, 256);

/// Per-frame input of the renderer.
///
/// The layout matches a graphics uniform buffer: two column-major matrices,
/// then two 16-byte groups. It is rebuilt by the host once per frame and
/// handed in whole, so every pixel of a frame reads the same values.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParameterBlock {
    /// Camera-to-world transform (rotation + translation)
    pub view_transform: [[f32; 4]; 4],
    /// Perspective projection, only its diagonal scale terms are read
    pub projection_transform: [[f32; 4]; 4],
    pub time: f32,
    pub fractal_power: f32,
    pub fractal_iterations: u32,
    /// 0..=5 selects a family, [`AUTO_CYCLE`] switches over time
    pub fractal_type: u32,
    pub camera_position: [f32; 3],
    pub _padding: f32,
}

impl ParameterBlock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_transform: Mat4::identity().into(),
            projection_transform: Mat4::identity().into(),
            time: 0.0,
            fractal_power: 8.0,
            fractal_iterations: 64,
            fractal_type: 0,
            camera_position: [0.0, 0.0, -3.0],
            _padding: 0.0,
        }
    }

    #[must_use]
    pub fn with_power(mut self, power: Real) -> Self {
        self.fractal_power = power.clamp(POWER_RANGE.0, POWER_RANGE.1);
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.fractal_iterations = iterations.clamp(ITERATION_RANGE.0, ITERATION_RANGE.1);
        self
    }

    #[must_use]
    pub const fn with_fractal_type(mut self, fractal_type: u32) -> Self {
        self.fractal_type = fractal_type;
        self
    }

    #[must_use]
    pub const fn at_time(mut self, time: Real) -> Self {
        self.time = time;
        self
    }

    /// Set both transforms and the ray origin in one go
    #[must_use]
    pub fn with_camera(mut self, view: Mat4, projection: Mat4, position: Point3) -> Self {
        self.view_transform = view.into();
        self.projection_transform = projection.into();
        self.camera_position = position.into();
        self
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from(self.view_transform)
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::from(self.projection_transform)
    }

    #[must_use]
    pub fn camera_position(&self) -> Point3 {
        Point3::from(self.camera_position)
    }

    /// Family evaluated for this frame
    #[must_use]
    pub fn active_family(&self) -> FractalFamily {
        FractalFamily::select(self.fractal_type, self.time)
    }

    /// Estimator inputs carried by this block
    #[must_use]
    pub const fn fractal_inputs(&self) -> FractalInputs {
        FractalInputs {
            power: self.fractal_power,
            iterations: self.fractal_iterations,
            time: self.time,
        }
    }

    #[must_use]
    pub fn fractal_name(&self) -> &'static str {
        match self.fractal_type {
            AUTO_CYCLE => "Auto-cycle",
            t if t < 6 => FractalFamily::from_index(t).name(),
            _ => "Unknown",
        }
    }

    /// Raw bytes, ready for a uniform buffer upload
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Default for ParameterBlock {
    fn default() -> Self {
        Self::new()
    }
}

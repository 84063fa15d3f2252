#![allow(clippy::cast_sign_loss)]

use cgmath::{Deg, EuclideanSpace, InnerSpace, SquareMatrix};
use log::warn;

use crate::{
    Real,
    json::{JsonObject, json_to_real, json_to_vec2u, json_to_vec3},
    params::ParameterBlock,
    vec::{Mat4, Point3, Vec2, Vec2u, Vec3},
};

/// Look-at perspective camera. It only produces the transforms stored in
/// the [`ParameterBlock`]; rays are built by the shader.
#[derive(Debug, Clone)]
pub struct CameraPerspective {
    pub resolution: Vec2u,
    pub position: Point3,
    pub target: Point3,
    pub up: Vec3,
    /// Vertical field of view, in degrees
    pub vfov: Real,
    pub znear: Real,
    pub zfar: Real,
}

impl Default for CameraPerspective {
    fn default() -> Self {
        Self {
            resolution: Vec2u::new(640, 480),
            position: Point3::new(0.0, 0.0, -3.0),
            target: Point3::origin(),
            up: Vec3::unit_y(),
            vfov: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

/// Unit direction for a yaw/pitch pair in degrees (yaw 90 looks down +z).
#[must_use]
pub fn look_direction(yaw: Real, pitch: Real) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

impl CameraPerspective {
    /// Read a camera object. `target` wins over `yaw`/`pitch` when both are given.
    pub fn from_json(json: &JsonObject) -> crate::Result<Self> {
        let default = Self::default();
        let resolution = json_to_vec2u(json, "resolution", default.resolution)?;
        let position = Point3::from_vec(json_to_vec3(json, "position", default.position.to_vec())?);

        let target = if json.contains_key("target") {
            Point3::from_vec(json_to_vec3(json, "target", Vec3::new(0.0, 0.0, 0.0))?)
        } else if json.contains_key("yaw") || json.contains_key("pitch") {
            let yaw = json_to_real(json, "yaw", 90.0);
            let pitch = json_to_real(json, "pitch", 0.0).clamp(-89.0, 89.0);
            position + look_direction(yaw, pitch)
        } else {
            default.target
        };

        Ok(Self {
            resolution,
            position,
            target,
            up: json_to_vec3(json, "up", default.up)?,
            vfov: json_to_real(json, "vfov", default.vfov),
            znear: json_to_real(json, "znear", default.znear),
            zfar: json_to_real(json, "zfar", default.zfar),
        })
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> Real {
        self.resolution.x as Real / self.resolution.y.max(1) as Real
    }

    /// Camera-to-world transform
    #[must_use]
    pub fn view_transform(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
            .invert()
            .unwrap_or_else(|| {
                warn!(
                    "Degenerate camera (position {:?}, target {:?}, up {:?}), keeping only its position",
                    self.position, self.target, self.up
                );
                Mat4::from_translation(self.position.to_vec())
            })
    }

    #[must_use]
    pub fn projection_transform(&self) -> Mat4 {
        cgmath::perspective(Deg(self.vfov), self.aspect_ratio(), self.znear, self.zfar)
    }

    /// Copy this camera into `params`
    #[must_use]
    pub fn apply(&self, params: ParameterBlock) -> ParameterBlock {
        params.with_camera(
            self.view_transform(),
            self.projection_transform(),
            self.position,
        )
    }

    /// Normalized device coordinates of the center of pixel `(x, y)`,
    /// y pointing up.
    #[must_use]
    pub fn pixel_to_ndc(&self, x: u32, y: u32) -> Vec2 {
        let u = (x as Real + 0.5) / self.resolution.x as Real;
        let v = (y as Real + 0.5) / self.resolution.y as Real;
        Vec2::new(u.mul_add(2.0, -1.0), v.mul_add(-2.0, 1.0))
    }

    pub fn scale(&mut self, factor: f32) {
        self.resolution.x = ((self.resolution.x as f32) * factor).max(1.0) as u32;
        self.resolution.y = ((self.resolution.y as f32) * factor).max(1.0) as u32;
    }
}

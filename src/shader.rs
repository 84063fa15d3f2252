//! Per-pixel evaluation: full-screen geometry, primary rays, marching and
//! the lighting model applied to hits.

use cgmath::{EuclideanSpace, InnerSpace};

use crate::{
    Real,
    palette::palette,
    params::ParameterBlock,
    ray::Ray,
    sdf::{FractalScene, RaymarchResult, RaymarchSettings, SDFObject, compute_normal, raymarch},
    vec::{Color3, Color4, Mat3, Point3, Vec2, Vec3, Vec4, clamp, is_valid_color},
};

/// Two triangles covering clip space, counter-clockwise.
pub const FULLSCREEN_VERTICES: [[Real; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

const BACKGROUND: [Real; 3] = [0.05, 0.02, 0.12];
const AMBIENT: Real = 0.3;
const FOG_DENSITY: Real = 0.01;
const OCCLUSION_STRENGTH: Real = 0.8;
const PALETTE_SCALE: Real = 0.3;

struct DirectionalLight {
    direction: [Real; 3],
    diffuse: Real,
    specular: Real,
    shininess: i32,
}

const LIGHTS: [DirectionalLight; 2] = [
    DirectionalLight {
        direction: [1.0, 1.0, -1.0],
        diffuse: 1.0,
        specular: 1.0,
        shininess: 32,
    },
    DirectionalLight {
        direction: [-1.0, 0.5, -0.6],
        diffuse: 0.5,
        specular: 0.3,
        shininess: 16,
    },
];

/// Clip-space position of a full-screen vertex, the index wraps every six.
#[must_use]
pub fn vertex_position(index: u32) -> Vec4 {
    let [x, y] = FULLSCREEN_VERTICES[(index % 6) as usize];
    Vec4::new(x, y, 0.0, 1.0)
}

/// Miss color, pulsing slowly with time.
#[must_use]
pub fn background(time: Real) -> Color3 {
    Color3::from(BACKGROUND) * 0.5f32.mul_add((0.3 * time).sin(), 1.0)
}

/// Result of one fragment invocation.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub color: Color4,
    pub march: RaymarchResult,
}

/// Fragment stage bound to one frame's parameters.
pub struct Shader<S: SDFObject = FractalScene> {
    params: ParameterBlock,
    field: S,
    settings: RaymarchSettings,
    /// Rotation part of the camera-to-world transform
    rotation: Mat3,
}

impl Shader<FractalScene> {
    /// Shader for the fractal family selected by `params`
    #[must_use]
    pub fn new(params: &ParameterBlock) -> Self {
        Self::with_field(params, FractalScene::from_parameters(params))
    }
}

impl<S: SDFObject> Shader<S> {
    #[must_use]
    pub fn with_field(params: &ParameterBlock, field: S) -> Self {
        let view = params.view_matrix();
        let rotation = Mat3::from_cols(view.x.truncate(), view.y.truncate(), view.z.truncate());
        Self {
            params: *params,
            field,
            settings: RaymarchSettings::default(),
            rotation,
        }
    }

    /// World-space ray through `ndc` (`[-1, 1]^2`, y up), starting at the
    /// camera position.
    #[must_use]
    pub fn primary_ray(&self, ndc: Vec2) -> Ray {
        let proj = self.params.projection_matrix();
        let sx = if proj.x.x.abs() > Real::EPSILON { proj.x.x } else { 1.0 };
        let sy = if proj.y.y.abs() > Real::EPSILON { proj.y.y } else { 1.0 };

        let dir_view = Vec3::new(ndc.x / sx, ndc.y / sy, -1.0).normalize();
        let dir_world = (self.rotation * dir_view).normalize();
        Ray::new(&self.params.camera_position(), &dir_world)
    }

    /// March the pixel at `ndc` and shade it.
    #[must_use]
    pub fn fragment(&self, ndc: Vec2) -> Fragment {
        let ray = self.primary_ray(ndc);
        let march = raymarch(&ray, &self.field, &self.settings);

        let color = match hit_position(&ray, &march) {
            Some(pos) => self.shade_hit(pos, ray.d, &march),
            None => background(self.params.time),
        };

        Fragment {
            color: color.extend(1.0),
            march,
        }
    }

    fn shade_hit(&self, pos: Point3, view_dir: Vec3, march: &RaymarchResult) -> Color3 {
        let time = self.params.time;
        let normal = compute_normal(pos, &self.field, self.settings.normal_epsilon);

        let lighting = LIGHTS
            .iter()
            .map(|light| light.contribution(normal, view_dir))
            .sum::<Real>()
            + AMBIENT;

        let base = palette(pos.to_vec().magnitude() * PALETTE_SCALE, march.steps, time);
        let occlusion = march.step_ratio(&self.settings).mul_add(-OCCLUSION_STRENGTH, 1.0);
        let fog = (-march.depth * FOG_DENSITY).exp();

        let color = base * (lighting * occlusion * fog);
        if is_valid_color(&color) {
            clamp(color, 0.0, 1.0)
        } else {
            background(time)
        }
    }
}

impl DirectionalLight {
    /// Diffuse plus Blinn specular for a surface seen along `view_dir`.
    fn contribution(&self, normal: Vec3, view_dir: Vec3) -> Real {
        let l = Vec3::from(self.direction).normalize();
        let diffuse = normal.dot(l).max(0.0);

        let half = l - view_dir;
        let specular = if half.magnitude2() > Real::EPSILON {
            normal.dot(half.normalize()).max(0.0).powi(self.shininess)
        } else {
            0.0
        };

        self.diffuse.mul_add(diffuse, self.specular * specular)
    }
}

/// Fragment stage as a free function: color for `ndc` under `params`.
#[must_use]
pub fn shade_fragment(ndc: Vec2, params: &ParameterBlock) -> Color4 {
    Shader::new(params).fragment(ndc).color
}

/// Hit position of a fragment, if any.
#[must_use]
pub fn hit_position(ray: &Ray, march: &RaymarchResult) -> Option<Point3> {
    march.is_hit().then(|| ray.point_at(march.depth))
}

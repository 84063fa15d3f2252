use crate::Real;

// 2D
pub type Vec2 = cgmath::Vector2<Real>;
pub type Vec2u = cgmath::Vector2<u32>;

// 3D and color
pub type Vec3 = cgmath::Vector3<Real>;
pub type Point3 = cgmath::Point3<Real>;
pub type Color3 = cgmath::Vector3<Real>;

// 4D
pub type Vec4 = cgmath::Vector4<Real>;
/// RGBA color as written by the fragment stage
pub type Color4 = cgmath::Vector4<Real>;

// Matrices
pub type Mat3 = cgmath::Matrix3<Real>;
pub type Mat4 = cgmath::Matrix4<Real>;

/// Convert from linear RGB to sRGB
#[must_use]
pub fn to_srgb(c: &Color3) -> Color3 {
    let mut result = Color3::new(0.0, 0.0, 0.0);

    for i in 0..3 {
        let value = c[i];
        if value <= 0.003_130_8 {
            result[i] = 12.92 * value;
        } else {
            result[i] = value.powf(1.0 / 2.4).mul_add(1.0 + 0.055, -0.055);
        }
    }

    result
}

/// Check if the color vector contains a NaN/Inf/negative value
#[must_use]
pub fn is_valid_color(c: &Color3) -> bool {
    for i in 0..3 {
        let value = c[i];
        if value < 0.0 || !value.is_finite() {
            return false;
        }
    }
    true
}

/// Linear blend between two colors (`t = 0` gives `a`)
#[must_use]
pub fn mix(a: Color3, b: Color3, t: Real) -> Color3 {
    a + (b - a) * t
}

/// Component-wise absolute value
#[must_use]
pub fn abs(v: Vec3) -> Vec3 {
    Vec3::new(v.x.abs(), v.y.abs(), v.z.abs())
}

/// Clamp every component to `[lo, hi]`
#[must_use]
pub fn clamp(v: Vec3, lo: Real, hi: Real) -> Vec3 {
    Vec3::new(v.x.clamp(lo, hi), v.y.clamp(lo, hi), v.z.clamp(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_is_monotonic_and_bounded() {
        let dark = to_srgb(&Color3::new(0.001, 0.001, 0.001));
        let mid = to_srgb(&Color3::new(0.2, 0.2, 0.2));
        let white = to_srgb(&Color3::new(1.0, 1.0, 1.0));
        assert!(dark.x < mid.x && mid.x < white.x);
        assert!((white.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_colors_are_detected() {
        assert!(is_valid_color(&Color3::new(0.0, 0.5, 1.0)));
        assert!(!is_valid_color(&Color3::new(Real::NAN, 0.5, 1.0)));
        assert!(!is_valid_color(&Color3::new(0.0, -0.1, 1.0)));
    }

    #[test]
    fn mix_hits_both_ends() {
        let a = Color3::new(0.0, 0.2, 0.4);
        let b = Color3::new(1.0, 0.6, 0.0);
        assert_eq!(mix(a, b, 0.0), a);
        cgmath::assert_abs_diff_eq!(mix(a, b, 1.0), b, epsilon = 1e-6);
    }
}

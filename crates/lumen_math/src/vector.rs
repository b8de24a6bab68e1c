//! Vector helpers layered on `glam::Vec3`.
//!
//! `Vec3` doubles as point, direction and linear RGB color.

use crate::Vec3;

/// RGB color in linear space, channels nominally in [0, 1].
pub type Color = Vec3;

/// True if every component is within 1e-8 of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    const S: f32 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Mirror `v` about the surface normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit direction `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices across the
/// interface. Callers check for total internal reflection first.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::splat(1e-9)));
        assert!(!near_zero(Vec3::new(0.0, 1e-6, 0.0)));
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));

        // Grazing vector is unchanged
        assert_eq!(reflect(Vec3::X, Vec3::Y), Vec3::X);
    }

    #[test]
    fn test_refract_unit_ratio_is_straight() {
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(uv, Vec3::Y, 1.0);
        assert!((out - uv).length() < 1e-5);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        // Entering a denser medium bends the ray toward -normal
        let uv = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(uv, Vec3::Y, 1.0 / 1.5);

        assert!((out.length() - 1.0).abs() < 1e-5);
        assert!(out.x < uv.x);
        assert!(out.y < 0.0);
    }
}

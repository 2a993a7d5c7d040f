// Vector helpers for ray tracing.
//
// Extends glam::DVec3 with the scattering utilities the path tracer needs.
// glam already provides dot/cross/normalize/length.

use crate::Vec3;

/// Extension trait for `Vec3` with ray-tracing utilities.
pub trait Vec3Ext {
    /// True if the vector is close to zero in all dimensions.
    fn near_zero(&self) -> bool;

    /// Mirror reflection about a unit normal.
    fn reflect(&self, normal: Vec3) -> Vec3;

    /// Refract a unit vector through a surface with unit normal `normal`.
    ///
    /// `etai_over_etat` is the ratio of refractive indices (incident over
    /// transmitted).
    fn refract(&self, normal: Vec3, etai_over_etat: f64) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn near_zero(&self) -> bool {
        const S: f64 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }

    #[inline]
    fn reflect(&self, normal: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(normal) * normal
    }

    fn refract(&self, normal: Vec3, etai_over_etat: f64) -> Vec3 {
        let cos_theta = (-*self).dot(normal).min(1.0);
        let r_out_perp = etai_over_etat * (*self + cos_theta * normal);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * normal;
        r_out_perp + r_out_parallel
    }
}

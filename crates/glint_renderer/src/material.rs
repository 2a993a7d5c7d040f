//! Material trait for surface scattering.

use std::sync::Arc;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f64, random_in_unit_sphere, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use glint_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel throughput multiplier for the scattered path
    pub attenuation: Color,
    /// The outgoing ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and scattered ray, or None if the ray is
    /// absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::textured(Arc::new(SolidColor::new(albedo)))
    }

    /// Diffuse material whose albedo comes from a texture.
    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = ray_in.direction().normalize().reflect(rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the reflection below the surface
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f64(rng) {
            unit_direction.reflect(rec.normal)
        } else {
            unit_direction.refract(rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::CheckerTexture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn upward_hit<'a>() -> HitRecord<'a> {
        HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Y,
            front_face: true,
            t: 1.0,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let mat = Lambertian::new(Color::new(0.8, 0.3, 0.3));
        let rec = upward_hit();
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.25);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert_eq!(result.scattered.origin(), rec.p);
            assert_eq!(result.scattered.time(), 0.25);
        }
    }

    #[test]
    fn test_lambertian_uses_texture() {
        let checker = Arc::new(CheckerTexture::from_colors(1.0, Color::ONE, Color::ZERO));
        let mat = Lambertian::textured(checker);
        let mut rec = upward_hit();
        rec.p = Vec3::new(1.5, 0.5, 0.5);
        let ray_in = Ray::new_simple(Vec3::new(1.5, 2.0, 0.5), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);

        let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::ZERO);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::splat(0.9), 0.0);
        let rec = upward_hit();
        let ray_in = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-9);
        assert_eq!(result.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let mat = Metal::new(Color::ONE, 5.0);
        assert_eq!(mat.fuzz, 1.0);
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        // Grazing ray with full fuzz: some samples must dip below the surface
        let mat = Metal::new(Color::ONE, 1.0);
        let rec = upward_hit();
        let ray_in = Ray::new_simple(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(11);

        let mut absorbed = 0;
        for _ in 0..200 {
            match mat.scatter(&ray_in, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let mat = Dielectric::new(1.5);
        let rec = upward_hit();
        let ray_in = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(5);

        let mut refracted = 0;
        for _ in 0..100 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            if result.scattered.direction().y < 0.0 {
                refracted += 1;
            }
        }
        // Schlick reflectance at normal incidence for glass is 4%
        assert!(refracted > 80);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Leaving the glass at a steep angle
        let rec = HitRecord {
            front_face: false,
            ..upward_hit()
        };
        let ray_in = Ray::new_simple(Vec3::new(-1.0, 0.2, 0.0), Vec3::new(1.0, -0.2, 0.0));
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..20 {
            let result = mat.scatter(&ray_in, &rec, &mut rng).unwrap();
            // Reflected back into the glass
            assert!(result.scattered.direction().y > 0.0);
        }
    }

    #[test]
    fn test_schlick_reflectance() {
        assert!((Dielectric::reflectance(1.0, 1.5) - 0.04).abs() < 1e-9);
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-9);
    }
}

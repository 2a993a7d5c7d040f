//! Sphere primitives for ray tracing.
//!
//! A sphere is either stationary or moves linearly between two centers over
//! ray time [0, 1]. `RotatingSphere` turns a sphere about the world Y axis
//! as the scene is updated frame by frame.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use glint_math::{Aabb, Interval, Ray, Vec3};

/// Placement of a sphere's center over ray time.
#[derive(Debug, Clone, Copy)]
struct Motion {
    /// Center at time 0
    center: Vec3,
    /// Displacement from time 0 to time 1 (zero when stationary)
    velocity: Vec3,
}

impl Motion {
    /// Center at the given ray time, clamped to [0, 1].
    fn center_at(&self, time: f64) -> Vec3 {
        self.center + time.clamp(0.0, 1.0) * self.velocity
    }

    /// Box enclosing the sphere at both ends of its motion.
    fn bounding_box(&self, radius: f64) -> Aabb {
        let rvec = Vec3::splat(radius);
        let start = Aabb::from_points(self.center - rvec, self.center + rvec);
        let end_center = self.center + self.velocity;
        let end = Aabb::from_points(end_center - rvec, end_center + rvec);
        Aabb::surrounding(&start, &end)
    }
}

/// A sphere primitive.
pub struct Sphere {
    motion: Motion,
    radius: f64,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a stationary sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self::with_motion(center, Vec3::ZERO, radius, material)
    }

    /// Create a sphere moving from `center0` at time 0 to `center1` at time 1.
    pub fn moving(center0: Vec3, center1: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self::with_motion(center0, center1 - center0, radius, material)
    }

    fn with_motion(center: Vec3, velocity: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self {
            motion: Motion { center, velocity },
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at time 0.
    pub fn center(&self) -> Vec3 {
        self.motion.center
    }

    /// Center at the given ray time.
    pub fn center_at(&self, time: f64) -> Vec3 {
        self.motion.center_at(time)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if self.radius <= 0.0 {
            return false;
        }

        let center = self.center_at(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.motion.bounding_box(self.radius)
    }
}

/// A sphere turning about the world Y axis.
///
/// On `update(time)` the sphere is rotated by `degrees_per_second * time`.
/// Its center orbits the axis and its surface (and so its texture) turns
/// with it, so a sphere centered on the axis visibly spins.
pub struct RotatingSphere {
    globe: Sphere,
    degrees_per_second: f64,
    /// Current rotation in radians, stored as `f64` bits
    angle: AtomicU64,
    bbox: Aabb,
}

impl RotatingSphere {
    pub fn new(globe: Sphere, degrees_per_second: f64) -> Self {
        let bbox = orbit_bounds(&globe.bounding_box());
        Self {
            globe,
            degrees_per_second,
            angle: AtomicU64::new(0.0_f64.to_bits()),
            bbox,
        }
    }

    /// Current rotation angle in radians.
    pub fn angle(&self) -> f64 {
        f64::from_bits(self.angle.load(Ordering::Relaxed))
    }

    /// Current center at time 0.
    pub fn center(&self) -> Vec3 {
        rotate_y(self.globe.center(), self.angle())
    }
}

impl Hittable for RotatingSphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let angle = self.angle();

        // Intersect in the sphere's unrotated frame
        let local = Ray::new(
            rotate_y(ray.origin(), -angle),
            rotate_y(ray.direction(), -angle),
            ray.time(),
        );
        if !self.globe.hit(&local, ray_t, rec) {
            return false;
        }

        rec.p = rotate_y(rec.p, angle);
        rec.normal = rotate_y(rec.normal, angle);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn update(&self, time: f64) {
        let radians = (self.degrees_per_second * time).to_radians();
        self.angle.store(radians.to_bits(), Ordering::Relaxed);
    }
}

/// Rotate `v` about the world Y axis by `radians`.
fn rotate_y(v: Vec3, radians: f64) -> Vec3 {
    let (sin_r, cos_r) = radians.sin_cos();
    Vec3::new(v.x * cos_r - v.z * sin_r, v.y, v.x * sin_r + v.z * cos_r)
}

/// Box enclosing every rotation of `bbox` about the world Y axis.
fn orbit_bounds(bbox: &Aabb) -> Aabb {
    let reach = [bbox.x.min, bbox.x.max]
        .into_iter()
        .flat_map(|x| [bbox.z.min, bbox.z.max].map(|z| x.hypot(z)))
        .fold(0.0, f64::max);

    Aabb::new(Interval::new(-reach, reach), bbox.y, Interval::new(-reach, reach))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::sampling::{gen_range, random_vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-9); // Should hit at t=0.5
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());

        // Origin inside: near root is negative, so the far root is used
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-9);
        assert!(!rec.front_face);
        assert!((rec.normal - (-Vec3::Z)).length() < 1e-9);
    }

    #[test]
    fn test_sphere_respects_interval() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray());
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        // Both roots (4 and 6) lie beyond the range
        assert!(!sphere.hit(&ray, Interval::new(0.001, 3.0), &mut rec));

        // Near root excluded, far root accepted
        assert!(sphere.hit(&ray, Interval::new(4.5, 10.0), &mut rec));
        assert!((rec.t - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_radius_never_hits() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), -2.0, gray());
        assert_eq!(sphere.radius(), 0.0);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!sphere.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_sphere_uv() {
        let cases = [
            (Vec3::X, (0.5, 0.5)),
            (Vec3::Y, (0.5, 1.0)),
            (Vec3::Z, (0.25, 0.5)),
            (Vec3::new(-1.0, 0.0, 0.0), (0.0, 0.5)),
            (Vec3::new(0.0, -1.0, 0.0), (0.5, 0.0)),
            (-Vec3::Z, (0.75, 0.5)),
        ];
        for (p, (u, v)) in cases {
            let (got_u, got_v) = Sphere::get_sphere_uv(p);
            assert!((got_u - u).abs() < 1e-9, "u for {p}: {got_u}");
            assert!((got_v - v).abs() < 1e-9, "v for {p}: {got_v}");
        }
    }

    #[test]
    fn test_moving_sphere_follows_ray_time() {
        let sphere = Sphere::moving(Vec3::new(0.0, 0.0, -3.0), Vec3::new(2.0, 0.0, -3.0), 0.5, gray());
        let ray_start = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let ray_end = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray_start, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!(!sphere.hit(&ray_end, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert_eq!(sphere.center_at(0.5), Vec3::new(1.0, 0.0, -3.0));
        assert_eq!(sphere.center_at(7.0), Vec3::new(2.0, 0.0, -3.0));
    }

    #[test]
    fn test_moving_sphere_box_covers_motion() {
        let sphere = Sphere::moving(Vec3::ZERO, Vec3::new(4.0, 1.0, 0.0), 1.0, gray());
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.x, Interval::new(-1.0, 5.0));
        assert_eq!(bbox.y, Interval::new(-1.0, 2.0));
        assert_eq!(bbox.z, Interval::new(-1.0, 1.0));
    }

    #[test]
    fn test_rotating_sphere_orbits_from_initial_center() {
        let rotating = RotatingSphere::new(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, gray()), 90.0);

        rotating.update(1.0);
        assert!((rotating.center() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-9);

        // Rotation is absolute in time, not accumulated per update
        rotating.update(1.0);
        assert!((rotating.center() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-9);

        rotating.update(2.0);
        assert!((rotating.center() - Vec3::new(-3.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_rotating_sphere_hits_at_rotated_center() {
        let rotating = RotatingSphere::new(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, gray()), 90.0);
        let down_z = Ray::new_simple(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(!rotating.hit(&down_z, Interval::new(0.001, f64::INFINITY), &mut rec));

        rotating.update(1.0);
        assert!(rotating.hit(&down_z, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 6.0).abs() < 1e-9);
        assert!((rec.p - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-9);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);
        assert!(rec.front_face);
    }

    #[test]
    fn test_rotating_sphere_box_covers_orbit() {
        let rotating = RotatingSphere::new(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, gray()), 33.0);
        let orbit = rotating.bounding_box();

        for step in 0..36 {
            rotating.update(step as f64);
            let c = rotating.center();
            let placed = Aabb::from_points(c - Vec3::ONE, c + Vec3::ONE);
            assert!(orbit.encloses(&placed), "step {step}");
        }
    }

    #[test]
    fn test_spin_shifts_texture_longitude() {
        let rotating = RotatingSphere::new(Sphere::new(Vec3::ZERO, 1.0, gray()), 90.0);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(rotating.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.u - 0.25).abs() < 1e-9);

        rotating.update(1.0);
        assert!(rotating.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.u - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_random_hits_lie_on_surface() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut hits = 0;

        for _ in 0..500 {
            let center = random_vec3(&mut rng, -5.0, 5.0);
            let radius = gen_range(&mut rng, 0.1, 3.0);
            let sphere = Sphere::new(center, radius, gray());

            // Aim somewhere around the sphere so a good share of rays hit
            let origin = random_vec3(&mut rng, -10.0, 10.0);
            let target = center + random_vec3(&mut rng, -radius, radius);
            let ray = Ray::new_simple(origin, target - origin);

            let t_min = gen_range(&mut rng, 0.0, 0.5);
            let ray_t = Interval::new(t_min, t_min + gen_range(&mut rng, 0.5, 20.0));
            let mut rec = HitRecord::default();

            if sphere.hit(&ray, ray_t, &mut rec) {
                hits += 1;
                assert!(ray_t.surrounds(rec.t), "t {} outside {:?}", rec.t, ray_t);
                assert!(((rec.p - center).length() - radius).abs() < 1e-7);
                assert!((rec.normal.length() - 1.0).abs() < 1e-9);
                assert!(rec.normal.dot(ray.direction()) <= 0.0);
            }
        }

        assert!(hits > 50, "only {hits} hits");
    }
}

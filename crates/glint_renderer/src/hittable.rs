//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::{Material, ScatterResult};
use glint_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A dummy material used for HitRecord::default().
/// Always absorbs light (returns None from scatter).
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }
}

/// Static dummy material instance for Default impl.
static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-object intersection.
///
/// Only valid inside the call chain that produced it; the material borrow
/// ties it to the scene being traced.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface texture coordinates
    pub u: f64,
    pub v: f64,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    /// `outward_normal` must be unit length.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Get the axis-aligned bounding box of this object.
    ///
    /// Animated objects report a box covering their whole motion.
    fn bounding_box(&self) -> Aabb;

    /// Advance animated state to `time` (seconds).
    ///
    /// Runs once per frame, before any ray of that frame is traced, and
    /// never concurrently with `hit` on the same scene.
    fn update(&self, _time: f64) {}
}

/// A flat list of hittable objects.
///
/// Objects are shared handles; the same object may also sit in a BVH.
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// The objects in insertion order.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Arc<dyn Hittable>> for HittableList {
    fn extend<I: IntoIterator<Item = Arc<dyn Hittable>>>(&mut self, iter: I) {
        for object in iter {
            self.add(object);
        }
    }
}

impl FromIterator<Arc<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hittable>>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn update(&self, time: f64) {
        for object in &self.objects {
            object.update(time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sphere_at(z: f64) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Lambertian::new(Vec3::splat(0.5))),
        ))
    }

    #[test]
    fn test_list_returns_closest_hit() {
        // Far sphere added first so the range has to narrow
        let list: HittableList = [sphere_at(-5.0), sphere_at(-2.0)].into_iter().collect();

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(list.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_list_bounding_box_grows() {
        let mut list = HittableList::new();
        assert!(list.is_empty());

        list.add(sphere_at(-5.0));
        list.add(sphere_at(5.0));

        let bbox = list.bounding_box();
        assert_eq!(list.len(), 2);
        assert_eq!(bbox.z, Interval::new(-5.5, 5.5));

        list.clear();
        assert_eq!(list.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_front_face_orientation() {
        let mut rec = HitRecord::default();

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        rec.set_face_normal(&ray, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    struct UpdateCounter(AtomicUsize);

    impl Hittable for UpdateCounter {
        fn hit<'a>(&'a self, _ray: &Ray, _ray_t: Interval, _rec: &mut HitRecord<'a>) -> bool {
            false
        }

        fn bounding_box(&self) -> Aabb {
            Aabb::from_points(Vec3::ZERO, Vec3::ONE)
        }

        fn update(&self, _time: f64) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_list_forwards_update() {
        let counter = Arc::new(UpdateCounter(AtomicUsize::new(0)));
        let mut list = HittableList::new();
        list.add(counter.clone());
        list.add(counter.clone());

        list.update(0.5);
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}

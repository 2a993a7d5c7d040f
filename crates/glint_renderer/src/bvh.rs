//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes built over shared scene objects. Leaves
//! are the objects themselves (the same `Arc`s the scene list holds), so the
//! hierarchy is an index over the scene rather than a copy of it.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList};
use glint_math::{Aabb, Interval, Ray};

/// BVH node - either a branch with two children or an empty tree.
///
/// A child is any hittable: a scene object or another `BvhNode`. A branch
/// built from a single object holds that object as both children.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node (built from an empty object list).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of shared hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let node = Self::build(&mut objects);
        log::debug!("Built BVH over {} objects", objects.len());
        node
    }

    /// Create a BVH indexing every object of a list.
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    /// Recursive BVH construction.
    ///
    /// Splits on the longest axis of the objects' combined box. Only the
    /// median has to land in place, so `select_nth_unstable_by` partitions
    /// around it instead of sorting the whole span.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));
        let axis = bounds.longest_axis();

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => {
                let (a, b) = (&objects[0], &objects[1]);
                if box_compare(a.as_ref(), b.as_ref(), axis) == Ordering::Less {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                }
            }
            span => {
                let mid = span / 2;
                objects.select_nth_unstable_by(mid, |a, b| box_compare(a.as_ref(), b.as_ref(), axis));

                let (lower, upper) = objects.split_at_mut(mid);
                (
                    Arc::new(Self::build(lower)) as Arc<dyn Hittable>,
                    Arc::new(Self::build(upper)) as Arc<dyn Hittable>,
                )
            }
        };

        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());
        BvhNode::Branch { left, right, bbox }
    }
}

/// Order two objects by the minimum of their boxes along `axis`.
fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.total_cmp(&b_min)
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_t = if hit_left { ray_t.with_max(rec.t) } else { ray_t };
                let hit_right = right.hit(ray, right_t, rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn update(&self, time: f64) {
        if let BvhNode::Branch { left, right, .. } = self {
            left.update(time);
            if !std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right)) {
                right.update(time);
            }
        }
    }
}

//! Glint renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer: spheres and triangles behind a BVH, diffuse,
//! metal, and glass materials, and a thin-lens camera with motion blur.
//! Frames render serially or bucket-parallel with rayon; animated scenes
//! render as sequences.

mod bucket;
mod bvh;
mod camera;
mod hittable;
mod material;
mod renderer;
pub mod sampling;
mod sequence;
mod sphere;
mod texture;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, Background, ImageBuffer,
    RenderConfig, MIN_HIT_DISTANCE,
};
pub use sequence::{render_sequence, FrameSchedule};
pub use sphere::{RotatingSphere, Sphere};
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture, MISSING_TEXTURE_COLOR};
pub use triangle::{mesh_triangles, Triangle};

/// Re-export Vec3 and common math types from glint_math
pub use glint_math::{Aabb, Interval, Point3, Ray, Vec3, Vec3Ext};

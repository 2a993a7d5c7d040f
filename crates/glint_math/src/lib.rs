//! Glint math - vectors, rays, intervals and bounding boxes.
//!
//! Positions, directions and colors share one double precision vector type.

// Re-export glam for convenience
pub use glam;
pub use glam::DVec3;

mod aabb;
mod interval;
mod ray;
mod vec;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vec::Vec3Ext;

/// 3D vector used for both points and directions.
pub type Vec3 = DVec3;

/// A position in space. Same representation as `Vec3`.
pub type Point3 = DVec3;

//! Glint Core - renderer-agnostic assets and settings.
//!
//! This crate provides:
//!
//! - **Meshes**: `Mesh` and OBJ parsing (`load_obj`, `parse_obj`)
//! - **Images**: `ImageData` decoding and (u, v) sampling for textures
//! - **Settings**: `RenderSettings`, the JSON-backed render configuration
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{load_obj, RenderSettings};
//!
//! let settings = RenderSettings::from_json_file("render.json")?;
//! let mesh = load_obj("teapot.obj")?;
//! println!("Loaded {} triangles at {}px wide",
//!     mesh.triangle_count(),
//!     settings.image_width);
//! ```

pub mod config;
pub mod mesh;
pub mod obj;
pub mod texture;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RenderSettings};
pub use mesh::Mesh;
pub use obj::{load_obj, parse_obj, MeshError, MeshResult};
pub use texture::{load_image, ImageData, TextureError, TextureResult};

//! Image loading for texture lookups.
//!
//! Decodes image files into linear RGB floats that the renderer samples by
//! (u, v) coordinate.

use std::path::Path;

use glint_math::Vec3;
use thiserror::Error;

/// Errors that can occur during image loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load image {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Image has no pixels: {0}x{1}")]
    Empty(u32, u32),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image with pixel data.
///
/// Stores pixels in linear RGB float format, row-major, first row at the top.
#[derive(Clone, Debug)]
pub struct ImageData {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Linear RGB pixels, row-major order
    pub pixels: Vec<Vec3>,
}

impl ImageData {
    /// Build an image from 8-bit sRGB triples, row-major, top row first.
    pub fn from_srgb8(width: u32, height: u32, bytes: &[u8]) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(width, height));
        }

        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(TextureError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(3)
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Sample the image at (u, v).
    ///
    /// Coordinates are clamped to [0, 1]; v = 0 is the bottom row. Uses
    /// nearest-texel lookup.
    pub fn sample(&self, u: f64, v: f64) -> Vec3 {
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0); // Flip V for image coordinates

        let x = ((u * self.width as f64) as u32).min(self.width - 1);
        let y = ((v * self.height as f64) as u32).min(self.height - 1);

        self.pixels[(y * self.width + x) as usize]
    }
}

/// Load an image from a file path.
pub fn load_image(path: impl AsRef<Path>) -> TextureResult<ImageData> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| TextureError::Load {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let data = ImageData::from_srgb8(width, height, rgb.as_raw())?;

    log::debug!(
        "Loaded image: {} ({}x{}, {:.1} KB)",
        path.display(),
        width,
        height,
        (data.pixels.len() * std::mem::size_of::<Vec3>()) as f64 / 1024.0
    );

    Ok(data)
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

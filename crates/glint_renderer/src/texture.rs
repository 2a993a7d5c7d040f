//! Textures: color lookups by surface coordinate and position.

use std::path::Path;
use std::sync::Arc;

use crate::Color;
use glint_core::{load_image, ImageData, TextureResult};
use glint_math::Vec3;

/// Fallback color for image textures whose file could not be loaded.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Trait for textures that map surface coordinates to a color.
pub trait Texture: Send + Sync {
    /// Color at texture coordinates (u, v) and world-space point `p`.
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color;
}

/// A texture with the same color everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two textures.
///
/// The pattern is carved out of space, not the surface: cells are cubes of
/// side `scale` and any surface crossing them picks up the pattern.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checkerboard between two solid colors.
    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(scale, Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        // Casts saturate for infinite cells (zero scale), so the sum must wrap
        let parity = (cell.x as i64)
            .wrapping_add(cell.y as i64)
            .wrapping_add(cell.z as i64)
            .rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// A texture sampled from a decoded image.
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }

    /// Load the image at `path`.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        Ok(Self::new(Arc::new(load_image(path)?)))
    }

    /// Load the image at `path`, or fall back to a solid cyan texture.
    ///
    /// The failure is logged; rendering continues with the fallback.
    pub fn open_or_fallback(path: impl AsRef<Path>) -> Arc<dyn Texture> {
        match Self::load(path.as_ref()) {
            Ok(texture) => Arc::new(texture),
            Err(e) => {
                log::warn!("Using fallback texture for {}: {}", path.as_ref().display(), e);
                Arc::new(SolidColor::new(MISSING_TEXTURE_COLOR))
            }
        }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Vec3) -> Color {
        self.image.sample(u, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.3, 0.7, Vec3::splat(9.0)), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates_in_space() {
        let even = Color::ONE;
        let odd = Color::ZERO;
        let checker = CheckerTexture::from_colors(1.0, even, odd);

        assert_eq!(checker.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), even);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), odd);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), even);
        // Negative cells floor away from zero
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), odd);
    }

    #[test]
    fn test_checker_scale() {
        let checker = CheckerTexture::from_colors(0.25, Color::ONE, Color::ZERO);

        assert_eq!(checker.value(0.0, 0.0, Vec3::new(0.1, 0.1, 0.1)), Color::ONE);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(0.3, 0.1, 0.1)), Color::ZERO);
    }

    #[test]
    fn test_checker_zero_scale_does_not_overflow() {
        let even = Color::new(1.0, 0.0, 0.0);
        let odd = Color::new(0.0, 0.0, 1.0);
        let checker = CheckerTexture::from_colors(0.0, even, odd);

        for p in [Vec3::ONE, Vec3::new(-2.0, 3.0, 1e300), Vec3::ZERO] {
            let c = checker.value(0.0, 0.0, p);
            assert!(c == even || c == odd, "{p} gave {c}");
        }
    }

    #[test]
    fn test_image_texture_samples_uv() {
        let image = ImageData::from_srgb8(2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
        let tex = ImageTexture::new(Arc::new(image));

        assert!((tex.value(0.1, 0.5, Vec3::ZERO) - Color::new(1.0, 0.0, 0.0)).length() < 1e-9);
        assert!((tex.value(0.9, 0.5, Vec3::ZERO) - Color::new(0.0, 0.0, 1.0)).length() < 1e-9);
    }

    #[test]
    fn test_missing_image_falls_back() {
        let tex = ImageTexture::open_or_fallback("no/such/earthmap.jpg");
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE_COLOR);
    }
}

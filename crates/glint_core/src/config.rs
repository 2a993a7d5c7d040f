//! Render settings: the numeric configuration surface of the renderer.
//!
//! Settings are plain data so they can be stored as JSON next to a scene.
//! Every field has a default, so a settings file only needs the values it
//! overrides.

use std::fs;
use std::path::Path;

use glint_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading render settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Image, camera, and animation settings for a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Random samples taken per pixel
    pub samples_per_pixel: u32,
    /// Maximum ray bounces into the scene
    pub max_depth: u32,

    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    /// Camera-relative "up" direction
    pub vup: [f64; 3],

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from look_from to the plane of perfect focus
    pub focus_dist: f64,

    /// Number of frames in an animated sequence
    pub total_frames: u32,
    /// Seconds between frame starts
    pub frame_duration: f64,
    /// Seconds the shutter stays open in each frame
    pub shutter_duration: f64,

    /// Seed for the sampling streams
    pub seed: u64,
    /// Worker threads for parallel rendering (None = one per core)
    pub threads: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 100,
            aspect_ratio: 1.0,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: [0.0, 0.0, 0.0],
            look_at: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
            defocus_angle: 0.0,
            focus_dist: 10.0,
            total_frames: 1,
            frame_duration: 1.0 / 24.0,
            shutter_duration: 1.0 / 48.0,
            seed: 0,
            threads: None,
        }
    }
}

impl RenderSettings {
    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse, and validate settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let settings = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::debug!("Loaded render settings from {}", path.display());
        Ok(settings)
    }

    /// Apply the fields present in a JSON object on top of these settings.
    ///
    /// Fields the JSON leaves out keep their current values rather than the
    /// defaults, so a preset can be partially overridden.
    pub fn overlay_json_str(&self, json: &str) -> ConfigResult<Self> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(ConfigError::Invalid {
                field: "settings",
                reason: "expected a JSON object".to_string(),
            });
        };

        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }

        let settings: Self = serde_json::from_value(merged)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a settings file and apply it on top of these settings.
    pub fn overlay_json_file(&self, path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let settings = self.overlay_json_str(&fs::read_to_string(path)?)?;
        log::debug!("Applied render settings from {}", path.display());
        Ok(settings)
    }

    /// Image height derived from width and aspect ratio (at least 1).
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigResult<()> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.image_width == 0 {
            return invalid("image_width", "must be at least 1");
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid("aspect_ratio", format!("must be positive, got {}", self.aspect_ratio));
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples_per_pixel", "must be at least 1");
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid("vfov", format!("must be in (0, 180), got {}", self.vfov));
        }
        let view = Vec3::from_array(self.look_from) - Vec3::from_array(self.look_at);
        if view == Vec3::ZERO {
            return invalid("look_at", "must differ from look_from");
        }
        // A vup along the view line leaves the camera basis undefined
        let vup = Vec3::from_array(self.vup);
        if vup.cross(view).length() <= 1e-8 * vup.length() * view.length() {
            return invalid("vup", "must not be zero or parallel to the view direction");
        }
        if !(self.focus_dist > 0.0) {
            return invalid("focus_dist", format!("must be positive, got {}", self.focus_dist));
        }
        if self.defocus_angle < 0.0 {
            return invalid("defocus_angle", "must not be negative");
        }
        if self.total_frames == 0 {
            return invalid("total_frames", "must be at least 1");
        }
        if self.frame_duration < 0.0 || self.shutter_duration < 0.0 {
            return invalid("shutter_duration", "durations must not be negative");
        }
        if self.threads == Some(0) {
            return invalid("threads", "must be at least 1 when set");
        }
        Ok(())
    }
}

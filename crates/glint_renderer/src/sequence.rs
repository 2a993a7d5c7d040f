//! Animated sequences: one render per frame with animated objects advanced
//! between frames.

use std::ops::ControlFlow;

use crate::bucket::render_parallel;
use crate::{Camera, Hittable, ImageBuffer, RenderConfig};
use glint_core::RenderSettings;
use glint_math::Interval;

/// Frame timing for an animated sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSchedule {
    pub total_frames: u32,
    /// Seconds between frame starts
    pub frame_duration: f64,
    /// Seconds the shutter stays open at the start of each frame
    pub shutter_duration: f64,
}

impl FrameSchedule {
    pub fn new(total_frames: u32, frame_duration: f64, shutter_duration: f64) -> Self {
        Self {
            total_frames,
            frame_duration,
            shutter_duration,
        }
    }

    /// A single still frame with the shutter open over [0, 1].
    pub fn still() -> Self {
        Self::new(1, 1.0, 1.0)
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.total_frames, settings.frame_duration, settings.shutter_duration)
    }

    /// Time at which `frame` starts.
    pub fn frame_start(&self, frame: u32) -> f64 {
        frame as f64 * self.frame_duration
    }

    /// Window ray times are drawn from while rendering `frame`.
    pub fn shutter_window(&self, frame: u32) -> Interval {
        let start = self.frame_start(frame);
        Interval::new(start, start + self.shutter_duration)
    }
}

impl Default for FrameSchedule {
    fn default() -> Self {
        Self::still()
    }
}

/// Render every frame of a sequence, handing each finished frame to
/// `on_frame`.
///
/// Before a frame is traced, `world.update` runs with the frame's start
/// time. Returning `ControlFlow::Break` from `on_frame` stops the sequence
/// before the next frame starts. Returns how many frames were rendered.
pub fn render_sequence<F>(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    schedule: &FrameSchedule,
    seed: u64,
    mut on_frame: F,
) -> usize
where
    F: FnMut(u32, ImageBuffer) -> ControlFlow<()>,
{
    let mut camera = camera.clone();
    let mut rendered = 0;

    for frame in 0..schedule.total_frames {
        let start = schedule.frame_start(frame);
        world.update(start);
        camera.set_shutter(schedule.shutter_window(frame));

        log::info!("Frame {}/{} at t={:.4}s", frame + 1, schedule.total_frames, start);
        let image = render_parallel(&camera, world, config, seed.wrapping_add(frame as u64));
        rendered += 1;

        if on_frame(frame, image).is_break() {
            log::info!("Sequence stopped after {} of {} frames", rendered, schedule.total_frames);
            break;
        }
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HitRecord, Lambertian, RotatingSphere, Sphere, Vec3};
    use glint_math::{Aabb, Ray};
    use std::f64::consts::FRAC_PI_2;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_shutter_windows() {
        let schedule = FrameSchedule::new(240, 1.0 / 24.0, 1.0 / 48.0);

        assert_eq!(schedule.shutter_window(0), Interval::new(0.0, 1.0 / 48.0));
        let w = schedule.shutter_window(24);
        assert!((w.min - 1.0).abs() < 1e-12);
        assert!((w.size() - 1.0 / 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_settings() {
        let settings = RenderSettings {
            total_frames: 3,
            frame_duration: 0.5,
            shutter_duration: 0.25,
            ..RenderSettings::default()
        };
        assert_eq!(FrameSchedule::from_settings(&settings), FrameSchedule::new(3, 0.5, 0.25));
    }

    /// Records the times it was updated with.
    struct TimeLog(Mutex<Vec<f64>>);

    impl Hittable for TimeLog {
        fn hit<'a>(&'a self, _ray: &Ray, _ray_t: Interval, _rec: &mut HitRecord<'a>) -> bool {
            false
        }

        fn bounding_box(&self) -> Aabb {
            Aabb::EMPTY
        }

        fn update(&self, time: f64) {
            self.0.lock().unwrap().push(time);
        }
    }

    fn tiny_camera() -> Camera {
        let mut camera = Camera::new().with_resolution(4, 4);
        camera.initialize();
        camera
    }

    #[test]
    fn test_updates_world_before_each_frame() {
        let world = TimeLog(Mutex::new(Vec::new()));
        let schedule = FrameSchedule::new(3, 0.5, 0.25);
        let config = RenderConfig {
            samples_per_pixel: 1,
            ..RenderConfig::default()
        };

        let mut frames = Vec::new();
        let count = render_sequence(&tiny_camera(), &world, &config, &schedule, 1, |frame, image| {
            frames.push((frame, image.width, image.height));
            ControlFlow::Continue(())
        });

        assert_eq!(count, 3);
        assert_eq!(frames, vec![(0, 4, 4), (1, 4, 4), (2, 4, 4)]);
        assert_eq!(*world.0.lock().unwrap(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_break_stops_between_frames() {
        let world = TimeLog(Mutex::new(Vec::new()));
        let schedule = FrameSchedule::new(10, 1.0, 0.5);

        let count = render_sequence(
            &tiny_camera(),
            &world,
            &RenderConfig::default(),
            &schedule,
            1,
            |frame, _| {
                if frame == 1 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        );

        assert_eq!(count, 2);
        assert_eq!(world.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_rotating_sphere_follows_frame_times() {
        let globe = Sphere::new(
            Vec3::new(2.0, 0.0, 0.0),
            0.5,
            Arc::new(Lambertian::new(Vec3::splat(0.5))),
        );
        let world = RotatingSphere::new(globe, 90.0);
        let schedule = FrameSchedule::new(2, 1.0, 0.5);
        let config = RenderConfig {
            samples_per_pixel: 1,
            max_depth: 2,
            ..RenderConfig::default()
        };

        let count = render_sequence(&tiny_camera(), &world, &config, &schedule, 0, |_, _| ControlFlow::Continue(()));

        // Last update ran at t = 1s
        assert_eq!(count, 2);
        assert!((world.angle() - FRAC_PI_2).abs() < 1e-12);
        assert!((world.center() - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-9);
    }
}

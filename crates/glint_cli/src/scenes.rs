//! Demo scene presets.
//!
//! Each preset builds its world and the render settings it looks best with;
//! a settings file given on the command line is applied on top.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use glint_core::{load_obj, RenderSettings};
use glint_renderer::sampling::{gen_f64, gen_range, random_vec3};
use glint_renderer::{
    mesh_triangles, BvhNode, CheckerTexture, Color, Dielectric, Hittable, HittableList, ImageTexture, Lambertian,
    Material, Metal, RotatingSphere, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed for scene layout, kept apart from the render seed so the same
/// layout renders under any sampling seed.
const LAYOUT_SEED: u64 = 0x5EED;

/// Scene names accepted on the command line.
pub const SCENE_NAMES: &str = "bouncing | checkered | earth | mesh=<file.obj>";

/// A world ready to render plus its preferred settings.
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub settings: RenderSettings,
}

/// Build a preset by name.
pub fn build(name: &str) -> Result<Scene> {
    let scene = match name {
        "bouncing" => bouncing_spheres(),
        "checkered" => checkered_spheres(),
        "earth" => earth(),
        _ => match name.strip_prefix("mesh=") {
            Some(path) => mesh(Path::new(path)),
            None => bail!("Unknown scene '{}' (expected {})", name, SCENE_NAMES),
        },
    };

    log::info!("Built scene '{}'", name);
    Ok(scene)
}

fn ground_checker() -> Arc<CheckerTexture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// Widescreen settings shared by the presets.
fn base_settings() -> RenderSettings {
    RenderSettings {
        image_width: 400,
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 10,
        max_depth: 50,
        vfov: 20.0,
        look_from: [13.0, 2.0, 3.0],
        look_at: [0.0, 0.0, 0.0],
        ..RenderSettings::default()
    }
}

/// A field of small random spheres around three large ones. The small
/// diffuse spheres bounce upwards over the shutter interval.
fn bouncing_spheres() -> Scene {
    let mut rng = StdRng::seed_from_u64(LAYOUT_SEED);
    let mut world = HittableList::new();

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(ground_checker())),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f64(&mut rng);
            let center = Vec3::new(
                a as f64 + 0.9 * gen_f64(&mut rng),
                0.2,
                b as f64 + 0.9 * gen_f64(&mut rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere = if choose_mat < 0.8 {
                let albedo = random_vec3(&mut rng, 0.0, 1.0) * random_vec3(&mut rng, 0.0, 1.0);
                let bounce = Vec3::new(0.0, gen_range(&mut rng, 0.0, 0.5), 0.0);
                Sphere::moving(center, center + bounce, 0.2, Arc::new(Lambertian::new(albedo)))
            } else if choose_mat < 0.95 {
                let albedo = random_vec3(&mut rng, 0.5, 1.0);
                let fuzz = gen_range(&mut rng, 0.0, 0.5);
                Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))
            } else {
                Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))
            };
            world.add(Arc::new(sphere));
        }
    }

    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    Scene {
        world: Arc::new(BvhNode::from_list(&world)),
        settings: RenderSettings {
            vfov: 105.0,
            defocus_angle: 0.6,
            focus_dist: 10.0,
            ..base_settings()
        },
    }
}

/// Two huge spheres sharing one checker texture.
fn checkered_spheres() -> Scene {
    let checker: Arc<dyn Material> = Arc::new(Lambertian::textured(ground_checker()));

    let world: HittableList = [
        Arc::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone())) as Arc<dyn Hittable>,
        Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker)),
    ]
    .into_iter()
    .collect();

    Scene {
        world: Arc::new(world),
        settings: base_settings(),
    }
}

/// A textured globe spinning in place, rendered as a sequence.
fn earth() -> Scene {
    let earth_surface = Arc::new(Lambertian::textured(ImageTexture::open_or_fallback("earthmap.jpg")));
    let globe = Sphere::new(Vec3::ZERO, 2.0, earth_surface);
    let world: HittableList = std::iter::once(Arc::new(RotatingSphere::new(globe, 240.25)) as Arc<dyn Hittable>).collect();

    Scene {
        world: Arc::new(world),
        settings: RenderSettings {
            samples_per_pixel: 2,
            look_from: [0.0, 0.0, 12.0],
            total_frames: 240,
            frame_duration: 1.0 / 24.0,
            shutter_duration: 1.0 / 48.0,
            ..base_settings()
        },
    }
}

/// An OBJ mesh resting on a checkered floor, framed by its bounds.
///
/// A mesh that fails to load is logged and leaves just the floor.
fn mesh(path: &Path) -> Scene {
    let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.2)));

    let (mut objects, center, size, floor_y) = match load_obj(path) {
        Ok(mesh) if !mesh.is_empty() => {
            log::info!("Loaded {} ({} triangles)", path.display(), mesh.triangle_count());
            let floor_y = mesh.bounds.y.min;
            (mesh_triangles(&mesh, material), mesh.center(), mesh.size(), floor_y)
        }
        Ok(_) => {
            log::warn!("{} has no faces; rendering the floor only", path.display());
            (Vec::new(), Vec3::ZERO, 1.0, 0.0)
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}; rendering the floor only", path.display(), e);
            (Vec::new(), Vec3::ZERO, 1.0, 0.0)
        }
    };

    objects.push(Arc::new(Sphere::new(
        Vec3::new(center.x, floor_y - 1000.0, center.z),
        1000.0,
        Arc::new(Lambertian::textured(ground_checker())),
    )));

    let look_from = center + Vec3::new(0.0, 0.35, 1.0) * (1.5 * size);

    Scene {
        world: Arc::new(BvhNode::new(objects)),
        settings: RenderSettings {
            vfov: 40.0,
            look_from: look_from.to_array(),
            look_at: center.to_array(),
            focus_dist: look_from.distance(center),
            ..base_settings()
        },
    }
}

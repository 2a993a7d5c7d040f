use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use glint_renderer::{render_parallel, render_sequence, Camera, FrameSchedule, ImageBuffer, RenderConfig};

mod scenes;

/// Command line: `glint <scene> [settings.json] [output]`.
#[derive(Debug, PartialEq)]
struct Args {
    scene: String,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        let Some(scene) = args.next() else {
            bail!("usage: glint <{}> [settings.json] [output]", scenes::SCENE_NAMES);
        };

        let mut settings = None;
        let mut output = None;
        for arg in args {
            let path = PathBuf::from(arg);
            let slot = if path.extension().is_some_and(|ext| ext == "json") {
                &mut settings
            } else {
                &mut output
            };
            if slot.replace(path).is_some() {
                bail!("usage: glint <{}> [settings.json] [output]", scenes::SCENE_NAMES);
            }
        }

        Ok(Self {
            scene,
            settings,
            output,
        })
    }
}

fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    image::save_buffer(path, &image.to_rgb8(), image.width, image.height, image::ColorType::Rgb8)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let scene = scenes::build(&args.scene)?;

    let settings = match &args.settings {
        Some(path) => scene
            .settings
            .overlay_json_file(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?,
        None => scene.settings.clone(),
    };

    let camera = Camera::from_settings(&settings);
    let config = RenderConfig::from_settings(&settings);
    let schedule = FrameSchedule::from_settings(&settings);

    // 0 lets rayon pick one thread per core
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads.unwrap_or(0))
        .build()
        .context("Failed to start render threads")?;

    log::info!(
        "Rendering {}x{} at {} spp, depth {}, {} thread(s)",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        config.max_depth,
        pool.current_num_threads()
    );
    let start = Instant::now();

    if schedule.total_frames <= 1 {
        let image = pool.install(|| render_parallel(&camera, scene.world.as_ref(), &config, settings.seed));
        let output = args.output.unwrap_or_else(|| PathBuf::from("render.png"));
        save_png(&image, &output)?;
    } else {
        let dir = args.output.unwrap_or_else(|| PathBuf::from("frames"));
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut failure = None;
        let rendered = pool.install(|| {
            render_sequence(&camera, scene.world.as_ref(), &config, &schedule, settings.seed, |frame, image| {
                match save_png(&image, &dir.join(format!("frame_{:04}.png", frame))) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(e) => {
                        failure = Some(e);
                        ControlFlow::Break(())
                    }
                }
            })
        });

        if let Some(e) = failure {
            return Err(e.context(format!("Sequence stopped after {} frame(s)", rendered)));
        }
    }

    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_scene_only() {
        let parsed = args(&["earth"]).unwrap();
        assert_eq!(parsed.scene, "earth");
        assert_eq!(parsed.settings, None);
        assert_eq!(parsed.output, None);
    }

    #[test]
    fn test_parse_settings_and_output_in_any_order() {
        let expected = Args {
            scene: "bouncing".to_string(),
            settings: Some(PathBuf::from("hq.json")),
            output: Some(PathBuf::from("out.png")),
        };
        assert_eq!(args(&["bouncing", "hq.json", "out.png"]).unwrap(), expected);
        assert_eq!(args(&["bouncing", "out.png", "hq.json"]).unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_bad_usage() {
        assert!(args(&[]).is_err());
        assert!(args(&["earth", "a.png", "b.png"]).is_err());
        assert!(args(&["earth", "a.json", "b.json"]).is_err());
    }
}

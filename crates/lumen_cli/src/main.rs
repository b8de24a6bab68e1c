use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{render, RenderConfig, DEFAULT_BUCKET_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod scenes;

use scenes::SceneKind;

/// Render an example scene to a plain-text PPM image.
#[derive(Debug, Parser)]
#[command(name = "lumen", version, about)]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::CornellBox)]
    scene: SceneKind,

    /// Image width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Width over height; defaults to the scene's own aspect ratio
    #[arg(long)]
    aspect: Option<f32>,

    /// Samples per pixel; defaults to the scene's recommendation
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long, default_value_t = 50)]
    max_depth: u32,

    /// Seed for scene construction and sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output file; writes to stdout when omitted
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Image used by the earth scene
    #[arg(long, default_value = "earthmap.jpg")]
    texture: PathBuf,

    /// Render threads; uses every core when omitted
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting lumen: {:?} scene", args.scene);

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure render threads")?;
    }

    let mut scene_rng = StdRng::seed_from_u64(args.seed);
    let scene = scenes::build(args.scene, &args.texture, &mut scene_rng)
        .with_context(|| format!("failed to build {:?} scene", args.scene))?;

    let aspect_ratio = args.aspect.unwrap_or(scene.aspect_ratio);
    anyhow::ensure!(
        aspect_ratio.is_finite() && aspect_ratio > 0.0,
        "aspect ratio must be positive, got {}",
        aspect_ratio
    );
    let image_height = ((args.width as f32 / aspect_ratio) as u32).max(1);

    let camera = scene.camera.with_aspect_ratio(aspect_ratio).build();
    let config = RenderConfig {
        image_width: args.width,
        image_height,
        samples_per_pixel: args.samples.unwrap_or(scene.samples_per_pixel),
        max_depth: args.max_depth,
        background: scene.background,
        seed: args.seed,
        bucket_size: DEFAULT_BUCKET_SIZE,
    };

    let image = render(&camera, &scene.world, &config);
    let pixels = image.to_rgb8();

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_image(BufWriter::new(file), image.width, image.height, &pixels)?;
            log::info!("Wrote {}", path.display());
        }
        None => write_image(BufWriter::new(io::stdout().lock()), image.width, image.height, &pixels)?,
    }

    Ok(())
}

fn write_image<W: Write>(mut writer: W, width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<()> {
    lumen_core::write_ppm(&mut writer, width, height, pixels).context("failed to write image")
}

//! Headless progressive render of the demo scene.
//!
//! Drives the frame controller the way an interactive viewer would, one `render_frame`
//! call per frame, until enough passes have accumulated, then writes the tone-mapped
//! result as a PNG.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use progressive_tracer::camera::PerspectiveCamera;
use progressive_tracer::controller::{FrameController, FrameStatus};
use progressive_tracer::imageio::DISPLAY_GAMMA;
use progressive_tracer::sampler::RandomSampler;
use progressive_tracer::scene::demo::demo_scene;
use progressive_tracer::settings::RenderSettings;
use progressive_tracer::surface::CpuSurface;
use progressive_tracer::Float;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

#[derive(Parser, Debug)]
#[command(name = "progressive-tracer")]
#[command(about = "Progressively ray trace the demo scene to a PNG", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Vertical field of view in degrees (10 to 90)
    #[arg(long, default_value_t = 60.0)]
    fov: Float,

    /// Deepest mirror bounce (1 to 5)
    #[arg(long, default_value_t = 3)]
    max_depth: u16,

    /// Row partitions traced in parallel (1 to 12)
    #[arg(long, default_value_t = 2)]
    partitions: usize,

    /// Passes to accumulate before saving
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..))]
    passes: u32,

    /// Seed for the per-pass sub-pixel offsets
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Exponent of the display power curve
    #[arg(long, default_value_t = DISPLAY_GAMMA)]
    gamma: Float,

    /// How long to wait between polls of a running pass
    #[arg(long, default_value_t = 10)]
    poll_ms: u64,

    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default()
        .with(filter)
        .with(HierarchicalLayer::new(2).with_targets(true))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let requested = RenderSettings {
        field_of_view: args.fov,
        max_depth: args.max_depth,
        partitions: args.partitions,
    };
    let settings = requested.clamped();
    if settings != requested {
        tracing::warn!(?settings, "render settings clamped to supported range");
    }

    let scene = demo_scene()?;
    let mut controller = FrameController::new(
        scene,
        PerspectiveCamera::default(),
        Box::new(RandomSampler::new_with_seed(args.seed)),
        args.width,
        args.height,
    ).with_poll_interval(Duration::from_millis(args.poll_ms));
    let mut surface = CpuSurface::with_gamma(args.gamma);

    let progress = ProgressBar::new(args.passes as u64);
    progress.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} passes {msg}")?);

    while controller.samples() < args.passes {
        if let FrameStatus::Presented(report) = controller.render_frame(settings, &mut surface)? {
            progress.set_position(report.samples as u64);
            progress.set_message(format!("{:.1} ms/pass", report.elapsed_ms()));
            if report.failed_partitions > 0 {
                tracing::warn!(failed = report.failed_partitions, "pass finished with failed partitions");
            }
        }
    }
    progress.finish();

    surface.save(&args.output)
        .with_context(|| format!("could not save {}", args.output.display()))?;
    Ok(())
}

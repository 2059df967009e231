use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mandel_core::{Complex, Size, ViewParameters};
use mandel_render::{ParallelRenderer, RenderMode, Renderer};
use tracing_subscriber::EnvFilter;

/// Render one view of the Mandelbrot set to an image file.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    iteration_depth: i32,
    /// Width of the canvas in plane units.
    #[arg(long, default_value_t = 4.0)]
    scale: f64,
    /// Rotation in radians.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    theta: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    real: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    imaginary: f64,

    #[arg(long, default_value_t = 640)]
    width: usize,
    #[arg(long, default_value_t = 480)]
    height: usize,

    /// Backend: cpu, cpu-parallel or web-gl.
    #[arg(long, default_value_t = RenderMode::Cpu)]
    mode: RenderMode,
    /// Strip workers for cpu-parallel; hardware concurrency if unset.
    #[arg(long)]
    workers: Option<usize>,

    /// Navigation steps applied, in order, before drawing.
    #[arg(long = "step", value_enum)]
    steps: Vec<Step>,

    /// Output path; the format follows the extension.
    out: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Step {
    ZoomIn,
    ZoomOut,
    RotateLeft,
    RotateRight,
    ScrollLeft,
    ScrollRight,
    ScrollUp,
    ScrollDown,
    Deeper,
    Shallower,
}

impl Step {
    fn apply(self, params: &mut ViewParameters) {
        match self {
            Step::ZoomIn => params.zoom_in(),
            Step::ZoomOut => params.zoom_out(),
            Step::RotateLeft => params.rotate_left(),
            Step::RotateRight => params.rotate_right(),
            Step::ScrollLeft => params.scroll_left(),
            Step::ScrollRight => params.scroll_right(),
            Step::ScrollUp => params.scroll_up(),
            Step::ScrollDown => params.scroll_down(),
            Step::Deeper => params.increase_iteration_depth(),
            Step::Shallower => params.decrease_iteration_depth(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut params = ViewParameters::new(
        args.iteration_depth,
        args.scale,
        args.theta,
        Complex::new(args.real, args.imaginary),
        Size {
            width: args.width,
            height: args.height,
        },
    );
    for step in &args.steps {
        step.apply(&mut params);
    }
    tracing::info!(
        depth = params.iteration_depth(),
        scale = params.scale(),
        theta = params.theta(),
        centre = %params.centre(),
        "view"
    );

    let mut renderer: Box<dyn Renderer> = match (args.mode, args.workers) {
        (RenderMode::CpuParallel, Some(workers)) => {
            Box::new(ParallelRenderer::with_workers(workers)?)
        }
        (mode, _) => mode.renderer()?,
    };
    let result = renderer.draw(&params)?;
    tracing::info!(
        backend = renderer.name(),
        elapsed_ms = result.elapsed_ms,
        "rendered"
    );

    renderer.framebuffer().to_image()?.save(&args.out)?;
    tracing::info!("wrote {}", args.out.display());
    Ok(())
}

//! Rendering backends for the Mandelbrot viewer.
//!
//! Three interchangeable backends implement [`Renderer`]:
//! -   [`SerialRenderer`] walks every pixel on the calling thread. It is the reference output.
//! -   [`ParallelRenderer`] splits the canvas into horizontal strips, hands each strip to a
//!     long-lived worker pool, and joins the strips back into one framebuffer.
//! -   [`ShaderRenderer`] evaluates the fragment-shader formulation per pixel, with its own
//!     fixed loop bound and hue colouring.
//!
//! The [`RenderServer`] owns one of each on a dispatch thread and draws requests one at a time.

use std::str::FromStr;

use mandel_core::{Error, Framebuffer, RenderResult, ViewParameters};

pub mod dispatcher;
mod oneshot;
mod parallel;
mod serial;
mod server;
mod shader;

pub use oneshot::Receiver;
pub use parallel::{default_workers, ParallelRenderer};
pub use serial::SerialRenderer;
pub use server::{Completion, RenderRequest, RenderServer, Rendered};
pub use shader::{fragment_shader_source, ShaderRenderer, SHADER_ITERATION_BOUND};

/// A backend that draws a view into its own framebuffer.
pub trait Renderer: Send {
    /// Short descriptive name of the backend, e.g. `serial`.
    fn name(&self) -> &'static str;

    /// Draws the view, replacing the framebuffer once the image is complete.
    ///
    /// Fails with [`Error::InvalidArgument`] if the view does not validate.
    fn draw(&mut self, params: &ViewParameters) -> Result<RenderResult, Error>;

    /// The most recently completed image.
    fn framebuffer(&self) -> &Framebuffer;
}

/// Which backend to draw with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    #[default]
    Cpu,
    CpuParallel,
    WebGl,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [RenderMode::Cpu, RenderMode::CpuParallel, RenderMode::WebGl];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Cpu => "cpu",
            RenderMode::CpuParallel => "cpu-parallel",
            RenderMode::WebGl => "web-gl",
        }
    }

    /// Constructs a fresh backend for this mode.
    pub fn renderer(&self) -> Result<Box<dyn Renderer>, Error> {
        Ok(match self {
            RenderMode::Cpu => Box::new(SerialRenderer::new()),
            RenderMode::CpuParallel => Box::new(ParallelRenderer::new()?),
            RenderMode::WebGl => Box::new(ShaderRenderer::new()),
        })
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown render mode {}", s)))
    }
}

//! Library code for the Mandelbrot viewer.
//!
//! This crate holds everything the rendering backends share:
//! the screen-to-plane transform, the view state that derives it,
//! the escape-time kernel, the colour policies, and the framebuffer.

pub mod colour;
pub mod framebuffer;
pub mod mandelbrot;
mod numeric;
pub mod transform;
pub mod view;

pub use framebuffer::Framebuffer;
pub use numeric::{Complex, KernelNumber};
pub use transform::AffineTransform;
pub use view::ViewParameters;

/// A pair of integer (width, height) dimensions, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    /// Number of pixels covered by this size.
    pub fn pixels(&self) -> usize {
        self.width * self.height
    }

    /// Length of an RGBA buffer of this size, or `None` if it overflows `usize`.
    pub fn byte_len(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(framebuffer::BYTES_PER_PIXEL)
    }
}

/// Errors that can occur while preparing or executing a render.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    InvalidArgument(String),
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Elapsed-time telemetry for one draw call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub elapsed_ms: f64,
}

impl RenderResult {
    pub fn since(start: std::time::Instant) -> Self {
        RenderResult {
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

use std::ops::Range;
use std::time::Instant;

use mandel_core::{
    colour, framebuffer::BYTES_PER_PIXEL, mandelbrot, AffineTransform, Error, Framebuffer,
    RenderResult, Size, ViewParameters,
};

use crate::Renderer;

/// Reference backend: every pixel, row-major, on the calling thread.
pub struct SerialRenderer {
    framebuffer: Framebuffer,
}

impl SerialRenderer {
    pub fn new() -> Self {
        SerialRenderer {
            framebuffer: Framebuffer::new(Size {
                width: 0,
                height: 0,
            }),
        }
    }
}

impl Default for SerialRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SerialRenderer {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn draw(&mut self, params: &ViewParameters) -> Result<RenderResult, Error> {
        params.validate()?;
        let span = tracing::info_span!("draw", backend = self.name());
        let _guard = span.enter();

        let start = Instant::now();
        let size = params.size();
        let mut frame = Framebuffer::new(size);
        fill_rows(
            &params.transform(),
            size.width,
            0..size.height,
            params.iteration_limit(),
            frame.rows_mut(0..size.height),
        );
        self.framebuffer = frame;
        let result = RenderResult::since(start);

        tracing::debug!(elapsed_ms = result.elapsed_ms, "serial draw complete");
        Ok(result)
    }

    fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}

/// Computes palette-banded pixels for `rows` of a canvas `width` pixels wide.
///
/// `out` covers exactly those rows, row-major, starting at the first pixel of `rows.start`.
/// Shared by the serial backend and the parallel strip workers, so both produce the same bytes.
pub(crate) fn fill_rows(
    transform: &AffineTransform,
    width: usize,
    rows: Range<usize>,
    iteration_limit: u32,
    out: &mut [u8],
) {
    debug_assert_eq!(out.len(), width * rows.len() * BYTES_PER_PIXEL);
    let row_bytes = width * BYTES_PER_PIXEL;
    for (y, row) in rows.zip(out.chunks_exact_mut(row_bytes)) {
        for (x, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let c = transform.apply(x as f64, y as f64);
            let escape = mandelbrot::iterations_to_escape(c, iteration_limit);
            px.copy_from_slice(&colour::palette_pixel(escape));
        }
    }
}

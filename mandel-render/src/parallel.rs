use std::{num::NonZeroUsize, sync::mpsc, time::Instant};

use mandel_core::{Error, Framebuffer, RenderResult, Size, ViewParameters};

use crate::{
    dispatcher::{self, StripResult},
    Renderer,
};

/// Worker count used when hardware concurrency can't be detected.
const FALLBACK_WORKERS: usize = 4;

/// The number of hardware threads, or four if unknown.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}

/// Fork-join backend.
///
/// Each draw is cut into horizontal strips, one per worker; strips are computed on a
/// thread pool that lives as long as the renderer, and copied into a fresh framebuffer
/// as they arrive. The framebuffer is only replaced once every strip is in.
pub struct ParallelRenderer {
    pool: rayon::ThreadPool,
    workers: usize,
    framebuffer: Framebuffer,
}

impl ParallelRenderer {
    pub fn new() -> Result<Self, Error> {
        Self::with_workers(default_workers())
    }

    pub fn with_workers(workers: usize) -> Result<Self, Error> {
        if workers < 1 {
            return Err(Error::InvalidArgument("must provide >=1 worker".to_string()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("strip-worker-{}", i))
            .build()
            .map_err(|v| Error::Internal(format!("error creating thread pool: {}", v)))?;

        Ok(ParallelRenderer {
            pool,
            workers,
            framebuffer: Framebuffer::new(Size {
                width: 0,
                height: 0,
            }),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Renderer for ParallelRenderer {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn draw(&mut self, params: &ViewParameters) -> Result<RenderResult, Error> {
        params.validate()?;
        let span = tracing::info_span!("draw", backend = self.name(), workers = self.workers);
        let _guard = span.enter();

        let start = Instant::now();
        let units = dispatcher::partition(params, self.workers);
        let mut pending = units.len();

        let (results, completed) = mpsc::channel::<StripResult>();
        for unit in units {
            let results = results.clone();
            // spawn_fifo so strips start in row order.
            self.pool.spawn_fifo(move || {
                // The receiver only hangs up if the draw already failed.
                let _ = results.send(unit.run());
            });
        }
        drop(results);
        tracing::debug!(pending, "strips dispatched");

        let mut frame = Framebuffer::new(params.size());
        while pending > 0 {
            let strip = completed
                .recv()
                .map_err(|_| Error::Internal("strip worker hung up".to_string()))?;
            frame.write_rows(strip.start_row, &strip.pixels)?;
            pending -= 1;
            tracing::trace!(
                start_row = strip.start_row,
                end_row = strip.end_row,
                pending,
                "strip joined"
            );
        }

        self.framebuffer = frame;
        let result = RenderResult::since(start);
        tracing::debug!(elapsed_ms = result.elapsed_ms, "parallel draw complete");
        Ok(result)
    }

    fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }
}

//! Strip partitioning and the messages exchanged with parallel workers.
//!
//! A draw is split into one [`WorkUnit`] per worker, each a band of whole rows.
//! Units carry everything a worker needs by value, so no worker ever reads the live view.
//! A worker answers with a [`StripResult`] holding the pixels of its band only.

use mandel_core::{framebuffer::BYTES_PER_PIXEL, AffineTransform, Size, ViewParameters};
use num::Integer;

use crate::serial::fill_rows;

/// The request half of the worker protocol: one strip of one draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorkUnit {
    pub start_row: usize,
    /// Exclusive.
    pub end_row: usize,
    pub canvas_width: usize,
    pub iteration_limit: u32,
    /// Snapshot of the screen-to-plane transform at dispatch time.
    pub transform: AffineTransform,
}

/// The response half: RGBA pixels for rows `start_row..end_row`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripResult {
    pub start_row: usize,
    pub end_row: usize,
    pub pixels: Vec<u8>,
}

impl WorkUnit {
    pub fn rows(&self) -> usize {
        self.end_row - self.start_row
    }

    /// Computes this strip into a private buffer.
    pub fn run(self) -> StripResult {
        let mut pixels = vec![0; self.canvas_width * self.rows() * BYTES_PER_PIXEL];
        fill_rows(
            &self.transform,
            self.canvas_width,
            self.start_row..self.end_row,
            self.iteration_limit,
            &mut pixels,
        );
        StripResult {
            start_row: self.start_row,
            end_row: self.end_row,
            pixels,
        }
    }
}

/// Splits the view's canvas into at most `workers` strips of `ceil(height / workers)` rows.
///
/// Workers whose strip would start below the canvas get no unit, so fewer than `workers`
/// units come back when the canvas is shorter than the worker count.
pub fn partition(params: &ViewParameters, workers: usize) -> Vec<WorkUnit> {
    let Size { width, height } = params.size();
    if workers == 0 || height == 0 {
        return Vec::new();
    }
    let strip_height = Integer::div_ceil(&height, &workers);
    let transform = params.transform();
    let iteration_limit = params.iteration_limit();

    let units: Vec<WorkUnit> = (0..workers)
        .map(|i| i * strip_height)
        .take_while(|start_row| *start_row < height)
        .map(|start_row| WorkUnit {
            start_row,
            end_row: std::cmp::min(start_row + strip_height, height),
            canvas_width: width,
            iteration_limit,
            transform,
        })
        .collect();
    if units.len() < workers {
        tracing::debug!(
            skipped = workers - units.len(),
            height,
            "canvas shorter than the worker pool"
        );
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(width: usize, height: usize) -> ViewParameters {
        let mut params = ViewParameters::default();
        params.set_size(Size { width, height });
        params
    }

    #[test]
    fn strips_cover_every_row_once() {
        for height in 1..=40 {
            for workers in 1..=9 {
                let units = partition(&view(5, height), workers);
                assert!(units.len() <= workers);
                let mut covered = vec![0u32; height];
                for unit in &units {
                    assert!(unit.start_row < unit.end_row);
                    for row in unit.start_row..unit.end_row {
                        covered[row] += 1;
                    }
                }
                assert!(
                    covered.iter().all(|n| *n == 1),
                    "height {} workers {}: {:?}",
                    height,
                    workers,
                    covered
                );
            }
        }
    }

    #[test]
    fn strips_are_in_row_order() {
        let units = partition(&view(10, 480), 8);
        assert_eq!(units.len(), 8);
        for pair in units.windows(2) {
            assert_eq!(pair[0].end_row, pair[1].start_row);
        }
        assert_eq!(units[0].rows(), 60);
    }

    #[test]
    fn short_canvas_skips_workers() {
        // ceil(3 / 8) = 1: three one-row strips, five idle workers.
        let units = partition(&view(10, 3), 8);
        assert_eq!(units.len(), 3);
        // ceil(10 / 4) = 3: strips of 3, 3, 3, 1.
        let units = partition(&view(10, 10), 4);
        let rows: Vec<usize> = units.iter().map(WorkUnit::rows).collect();
        assert_eq!(rows, vec![3, 3, 3, 1]);
        // ceil(9 / 6) = 2: the fifth strip would start at row 10, past the canvas.
        assert_eq!(partition(&view(10, 9), 6).len(), 5);
    }

    #[test]
    fn units_snapshot_the_view() {
        let mut params = view(8, 8);
        let units = partition(&params, 2);
        let snapshot = params.transform();
        params.zoom_in_to(1.0, 1.0);
        assert!(units.iter().all(|u| u.transform == snapshot));
        assert_ne!(params.transform(), snapshot);
    }

    #[test]
    fn strip_pixels_cover_their_rows() {
        let params = view(6, 7);
        let unit = partition(&params, 3)[1];
        let strip = unit.run();
        assert_eq!((strip.start_row, strip.end_row), (3, 6));
        assert_eq!(strip.pixels.len(), 6 * 3 * BYTES_PER_PIXEL);
    }
}

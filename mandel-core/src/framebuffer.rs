//! The RGBA framebuffer every backend draws into.

use std::ops::Range;

use crate::{Error, Size};

pub const BYTES_PER_PIXEL: usize = 4;

/// A row-major RGBA image, four bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    size: Size,
    data: Vec<u8>,
}

impl Framebuffer {
    /// A zeroed (transparent black) framebuffer.
    pub fn new(size: Size) -> Self {
        Framebuffer {
            size,
            data: vec![0; size.pixels() * BYTES_PER_PIXEL],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte length of one row.
    pub fn stride(&self) -> usize {
        self.size.width * BYTES_PER_PIXEL
    }

    /// The RGBA bytes of one pixel, if it is on the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let at = (y * self.size.width + x) * BYTES_PER_PIXEL;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[at..at + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Mutable bytes for a contiguous range of rows.
    pub fn rows_mut(&mut self, rows: Range<usize>) -> &mut [u8] {
        let stride = self.stride();
        &mut self.data[rows.start * stride..rows.end * stride]
    }

    /// Copies whole rows of pixel data in, starting at `start_row`.
    pub fn write_rows(&mut self, start_row: usize, pixels: &[u8]) -> Result<(), Error> {
        let stride = self.stride();
        if stride == 0 || pixels.len() % stride != 0 {
            return Err(Error::Internal(format!(
                "strip of {} bytes is not a whole number of {}-byte rows",
                pixels.len(),
                stride
            )));
        }
        let end_row = start_row + pixels.len() / stride;
        if end_row > self.size.height {
            return Err(Error::Internal(format!(
                "rows {}..{} fall outside a canvas of height {}",
                start_row, end_row, self.size.height
            )));
        }
        self.rows_mut(start_row..end_row).copy_from_slice(pixels);
        Ok(())
    }

    /// Converts into an image, e.g. for PNG encoding.
    pub fn to_image(&self) -> Result<image::RgbaImage, Error> {
        image::RgbaImage::from_raw(
            self.size.width as u32,
            self.size.height as u32,
            self.data.clone(),
        )
        .ok_or_else(|| {
            Error::Internal(format!(
                "error: data size != width * height * 4: {} != {} * {} * 4",
                self.data.len(),
                self.size.width,
                self.size.height
            ))
        })
    }
}

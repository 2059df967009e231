//! Mutable view state over the complex plane.

use std::f64::consts::TAU;

use crate::{AffineTransform, Complex, Error, Size};

/// Factor applied to the scale by one zoom step.
pub const ZOOM_FACTOR: f64 = 1.25;
/// Angle, in radians, turned by one rotation step.
pub const ROTATION_STEP: f64 = 1.0 / 16.0;
/// Change in iteration depth for one increase/decrease step.
pub const ITERATION_STEP: i32 = 100;
/// Fraction of the scale moved by one scroll step.
pub const SCROLL_FRACTION: f64 = 0.25;
/// Longest canvas edge, in pixels, a view may ask for.
pub const MAX_EDGE: usize = 1 << 15;

/// What part of the complex plane is visible, and how deeply it is iterated.
///
/// Every mutator recomputes the cached screen-to-plane transform before it returns,
/// so [`ViewParameters::transform`] is always consistent with the fields.
/// Screen pixel (0, 0) is the top-left corner; the centre maps to the middle of the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewParameters {
    iteration_depth: i32,
    scale: f64,
    theta: f64,
    centre: Complex,
    size: Size,
    transform: AffineTransform,
}

impl Default for ViewParameters {
    fn default() -> Self {
        ViewParameters::new(
            1000,
            4.0,
            0.0,
            Complex::new(0.0, 0.0),
            Size {
                width: 640,
                height: 480,
            },
        )
    }
}

impl ViewParameters {
    pub fn new(iteration_depth: i32, scale: f64, theta: f64, centre: Complex, size: Size) -> Self {
        let mut params = ViewParameters {
            iteration_depth,
            scale,
            theta,
            centre,
            size,
            transform: AffineTransform::IDENTITY,
        };
        params.recompute();
        params
    }

    /// Checks the preconditions every renderer relies on.
    pub fn validate(&self) -> Result<(), Error> {
        if self.iteration_depth < 1 {
            return Err(Error::InvalidArgument(format!(
                "iteration depth must be at least 1, got {}",
                self.iteration_depth
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "scale must be finite and positive, got {}",
                self.scale
            )));
        }
        if self.size.width == 0 || self.size.height == 0 {
            return Err(Error::InvalidArgument(format!(
                "canvas must be non-empty, got {}x{}",
                self.size.width, self.size.height
            )));
        }
        if self.size.width > MAX_EDGE || self.size.height > MAX_EDGE {
            return Err(Error::InvalidArgument(format!(
                "canvas {}x{} exceeds {} pixels on a side",
                self.size.width, self.size.height, MAX_EDGE
            )));
        }
        if self.size.byte_len().is_none() {
            return Err(Error::InvalidArgument(format!(
                "canvas {}x{} does not fit in memory",
                self.size.width, self.size.height
            )));
        }
        Ok(())
    }

    pub fn iteration_depth(&self) -> i32 {
        self.iteration_depth
    }

    /// The iteration depth as a loop bound; zero for the (invalid) non-positive depths.
    pub fn iteration_limit(&self) -> u32 {
        self.iteration_depth.max(0) as u32
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn centre(&self) -> Complex {
        self.centre
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The screen-to-plane transform for the current view.
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// The plane coordinate under a screen pixel.
    pub fn screen_to_complex(&self, x: f64, y: f64) -> Complex {
        self.transform.apply(x, y)
    }

    pub fn set_iteration_depth(&mut self, depth: i32) {
        self.iteration_depth = depth;
        self.recompute();
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.recompute();
    }

    /// Sets the rotation angle as given; only the rotate steps wrap it.
    pub fn set_theta(&mut self, theta: f64) {
        self.theta = theta;
        self.recompute();
    }

    pub fn set_centre(&mut self, centre: Complex) {
        self.centre = centre;
        self.recompute();
    }

    pub fn set_real(&mut self, re: f64) {
        self.centre.re = re;
        self.recompute();
    }

    pub fn set_imaginary(&mut self, im: f64) {
        self.centre.im = im;
        self.recompute();
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.recompute();
    }

    pub fn zoom_in(&mut self) {
        self.scale /= ZOOM_FACTOR;
        self.recompute();
    }

    pub fn zoom_out(&mut self) {
        self.scale *= ZOOM_FACTOR;
        self.recompute();
    }

    /// Recentres on the point under the given pixel, then zooms in.
    pub fn zoom_in_to(&mut self, x: f64, y: f64) {
        self.centre = self.screen_to_complex(x, y);
        self.zoom_in();
    }

    /// Recentres on the point under the given pixel, then zooms out.
    pub fn zoom_out_to(&mut self, x: f64, y: f64) {
        self.centre = self.screen_to_complex(x, y);
        self.zoom_out();
    }

    pub fn rotate_left(&mut self) {
        self.theta = wrap_angle(self.theta - ROTATION_STEP);
        self.recompute();
    }

    pub fn rotate_right(&mut self) {
        self.theta = wrap_angle(self.theta + ROTATION_STEP);
        self.recompute();
    }

    pub fn scroll_left(&mut self) {
        self.scroll(-1.0, 0.0);
    }

    pub fn scroll_right(&mut self) {
        self.scroll(1.0, 0.0);
    }

    pub fn scroll_up(&mut self) {
        self.scroll(0.0, -1.0);
    }

    pub fn scroll_down(&mut self) {
        self.scroll(0.0, 1.0);
    }

    pub fn increase_iteration_depth(&mut self) {
        self.iteration_depth += ITERATION_STEP;
        self.recompute();
    }

    /// Lowers the depth by one step. There is no floor;
    /// [`ViewParameters::validate`] rejects depths below 1.
    pub fn decrease_iteration_depth(&mut self) {
        self.iteration_depth -= ITERATION_STEP;
        self.recompute();
    }

    /// Moves the centre by a quarter of the scale along the screen axes `(dx, dy)`,
    /// expressed in the rotated plane frame.
    fn scroll(&mut self, dx: f64, dy: f64) {
        let step = self.scale * SCROLL_FRACTION;
        // Screen axes as seen in the plane: the transform rotates by -theta.
        let axes = AffineTransform::rotation(-self.theta);
        self.centre.re += step * axes.apply_x(dx, dy);
        self.centre.im += step * axes.apply_y(dx, dy);
        self.recompute();
    }

    fn recompute(&mut self) {
        let width = self.size.width as f64;
        let height = self.size.height as f64;
        self.transform = AffineTransform::translation(self.centre.re, self.centre.im)
            * AffineTransform::scale(self.scale / width)
            * AffineTransform::rotation(-self.theta)
            * AffineTransform::translation(-width / 2.0, -height / 2.0);
    }
}

/// Wraps an angle into [0, 2π).
fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

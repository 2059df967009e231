//! Affine transforms of the plane, as 2x3 homogeneous matrices.

use std::ops::Mul;

use crate::Complex;

/// An affine map of the plane:
///
/// ```text
/// x' = m11·x + m21·y + m31
/// y' = m12·x + m22·y + m32
/// ```
///
/// Transforms are plain values; every operation returns a new one.
/// Behaviour on non-finite coefficients is unspecified.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AffineTransform {
    m11: f64,
    m21: f64,
    m31: f64,
    m12: f64,
    m22: f64,
    m32: f64,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        m11: 1.0,
        m21: 0.0,
        m31: 0.0,
        m12: 0.0,
        m22: 1.0,
        m32: 0.0,
    };

    /// Builds a transform from its coefficients, in `[m11, m21, m31, m12, m22, m32]` order.
    pub const fn from_coefficients(m: [f64; 6]) -> Self {
        AffineTransform {
            m11: m[0],
            m21: m[1],
            m31: m[2],
            m12: m[3],
            m22: m[4],
            m32: m[5],
        }
    }

    /// The coefficients, in `[m11, m21, m31, m12, m22, m32]` order.
    pub const fn coefficients(&self) -> [f64; 6] {
        [self.m11, self.m21, self.m31, self.m12, self.m22, self.m32]
    }

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::from_coefficients([1.0, 0.0, dx, 0.0, 1.0, dy])
    }

    /// Rotation about the origin; positive angles turn counter-clockwise.
    pub fn rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::from_coefficients([cos, -sin, 0.0, sin, cos, 0.0])
    }

    /// Uniform scaling about the origin.
    pub const fn scale(factor: f64) -> Self {
        Self::from_coefficients([factor, 0.0, 0.0, 0.0, factor, 0.0])
    }

    /// Matrix product `self · other`: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &AffineTransform) -> Self {
        let (a, b) = (self, other);
        AffineTransform {
            m11: a.m11 * b.m11 + a.m21 * b.m12,
            m21: a.m11 * b.m21 + a.m21 * b.m22,
            m31: a.m11 * b.m31 + a.m21 * b.m32 + a.m31,
            m12: a.m12 * b.m11 + a.m22 * b.m12,
            m22: a.m12 * b.m21 + a.m22 * b.m22,
            m32: a.m12 * b.m31 + a.m22 * b.m32 + a.m32,
        }
    }

    #[inline]
    pub fn apply_x(&self, x: f64, y: f64) -> f64 {
        self.m11 * x + self.m21 * y + self.m31
    }

    #[inline]
    pub fn apply_y(&self, x: f64, y: f64) -> f64 {
        self.m12 * x + self.m22 * y + self.m32
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> Complex {
        Complex::new(self.apply_x(x, y), self.apply_y(x, y))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<AffineTransform> for AffineTransform {
    type Output = AffineTransform;

    fn mul(self, rhs: AffineTransform) -> AffineTransform {
        self.compose(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(got: Complex, want: (f64, f64)) {
        assert!(
            (got.re - want.0).abs() < TOLERANCE && (got.im - want.1).abs() < TOLERANCE,
            "got {}, want {:?}",
            got,
            want
        );
    }

    #[test]
    fn identity_leaves_points_unchanged() {
        for (x, y) in [(1.0, 2.0), (-3.5, 0.0), (1e9, -1e-9), (0.0, 0.0)] {
            assert_eq!(AffineTransform::identity().apply_x(x, y), x);
            assert_eq!(AffineTransform::identity().apply_y(x, y), y);
        }
    }

    #[test]
    fn rotates_anticlockwise() {
        let quarter = AffineTransform::rotation(PI / 2.0);
        assert_close(quarter.apply(1.0, 2.0), (-2.0, 1.0));
    }

    #[test]
    fn rightmost_applies_first() {
        // Translate then scale: (1, 1) -> (3, 1) -> (6, 2).
        let t = AffineTransform::scale(2.0) * AffineTransform::translation(2.0, 0.0);
        assert_close(t.apply(1.0, 1.0), (6.0, 2.0));
        // Scale then translate: (1, 1) -> (2, 2) -> (4, 2).
        let t = AffineTransform::translation(2.0, 0.0) * AffineTransform::scale(2.0);
        assert_close(t.apply(1.0, 1.0), (4.0, 2.0));
    }

    #[test]
    fn composition_is_associative() {
        let a = AffineTransform::translation(0.25, -1.5);
        let b = AffineTransform::rotation(0.7);
        let c = AffineTransform::scale(3.0) * AffineTransform::translation(-320.0, -240.0);
        let left = (a * b) * c;
        let right = a * (b * c);
        for (x, y) in [(0.0, 0.0), (17.0, 301.0), (-4.0, 9.5), (639.0, 479.0)] {
            let l = left.apply(x, y);
            assert_close(right.apply(x, y), (l.re, l.im));
        }
    }

    #[test]
    fn composition_matches_sequential_application() {
        let a = AffineTransform::rotation(-1.0 / 16.0);
        let b = AffineTransform::translation(5.0, 7.0);
        let composed = a.compose(&b);
        let step = b.apply(2.0, 3.0);
        let sequential = a.apply(step.re, step.im);
        assert_close(composed.apply(2.0, 3.0), (sequential.re, sequential.im));
    }

    #[test]
    fn coefficients_round_trip() {
        let t = AffineTransform::rotation(0.3) * AffineTransform::translation(1.0, 2.0);
        assert_eq!(AffineTransform::from_coefficients(t.coefficients()), t);
    }
}

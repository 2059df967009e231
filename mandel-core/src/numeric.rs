use std::ops::{Add, Mul, Sub};

/// A floating-point type complex arithmetic can run in.
///
/// The CPU backends work in `f64`; the shader backend works in `f32`,
/// the precision a fragment shader offers.
pub trait KernelNumber:
    Copy
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + PartialOrd<Self>
    + std::fmt::Debug
    + Send
    + Sync
{
    // Provides this type's representation of two.
    fn two() -> Self;
}

impl KernelNumber for f32 {
    fn two() -> Self {
        2f32
    }
}

impl KernelNumber for f64 {
    fn two() -> Self {
        2f64
    }
}

/// Complex number implementation.
/// Only used as a coordinate pair; the hot loops work on the components directly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Complex<N = f64> {
    pub re: N,
    pub im: N,
}

impl<N> Complex<N> {
    pub const fn new(re: N, im: N) -> Self {
        Complex { re, im }
    }
}

impl<N: KernelNumber> Complex<N> {
    /// Squares the given number.
    pub fn square(&self) -> Self {
        // (a+bi)^2 = (a^2-b^2) + 2abi
        let re = self.re * self.re - self.im * self.im;
        let im = N::two() * self.re * self.im;
        Self { re, im }
    }

    /// Squared magnitude, |z|^2.
    pub fn norm_sqr(&self) -> N {
        self.re * self.re + self.im * self.im
    }
}

impl<N> Add<Complex<N>> for Complex<N>
where
    N: Add<N, Output = N>,
{
    type Output = Complex<N>;

    fn add(self, rhs: Complex<N>) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl<N> From<(N, N)> for Complex<N> {
    fn from((re, im): (N, N)) -> Self {
        Complex { re, im }
    }
}

impl<N: std::fmt::Display> std::fmt::Display for Complex<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}i", self.re, self.im)
    }
}

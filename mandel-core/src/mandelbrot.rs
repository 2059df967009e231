//! The escape-time kernel for z ← z² + c.

use crate::Complex;

/// Counts the iterations before the orbit of `c` leaves the radius-2 disc.
///
/// Returns `Some(i)` for the first iteration `i < max_iterations` at which `|z|² ≥ 4`,
/// or `None` when the orbit stays bounded for all `max_iterations` steps
/// (the point is treated as inside the set).
///
/// The squared components are computed once per iteration and used both for the bailout
/// test and for the next iterate's real part.
#[inline]
pub fn iterations_to_escape(c: Complex, max_iterations: u32) -> Option<u32> {
    let (mut re, mut im) = (0f64, 0f64);
    let (mut re_sq, mut im_sq) = (0f64, 0f64);

    for i in 0..max_iterations {
        let next_re = re_sq - im_sq + c.re;
        im = 2.0 * re * im + c.im;
        re = next_re;

        re_sq = re * re;
        im_sq = im * im;

        // |z| >= 2, compared squared to skip the square root.
        if re_sq + im_sq >= 4.0 {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_bounded() {
        for limit in [0, 1, 2, 10, 1000, 5000] {
            assert_eq!(iterations_to_escape(Complex::new(0.0, 0.0), limit), None);
        }
    }

    #[test]
    fn far_point_escapes_immediately() {
        for limit in [1, 2, 10, 1000] {
            assert_eq!(iterations_to_escape(Complex::new(2.0, 2.0), limit), Some(0));
        }
    }

    #[test]
    fn zero_limit_never_escapes() {
        assert_eq!(iterations_to_escape(Complex::new(2.0, 2.0), 0), None);
    }

    #[test]
    fn matches_textbook_recurrence() {
        let textbook = |c: Complex, limit: u32| -> Option<u32> {
            let mut z = Complex::new(0.0, 0.0);
            for i in 0..limit {
                z = z.square() + c;
                if z.norm_sqr() >= 4.0 {
                    return Some(i);
                }
            }
            None
        };
        for (re, im) in [(-0.75, 0.1), (0.3, 0.5), (-1.25, 0.0), (0.2501, 0.0), (-0.1, 0.9)] {
            let c = Complex::new(re, im);
            assert_eq!(iterations_to_escape(c, 500), textbook(c, 500), "at {}", c);
        }
    }

    #[test]
    fn raising_the_cap_keeps_escapes() {
        let points = [
            Complex::new(-0.75, 0.1),
            Complex::new(0.26, 0.0),
            Complex::new(-0.7454, 0.1130),
            Complex::new(0.0, 1.0),
            Complex::new(-2.1, 0.0),
        ];
        for c in points {
            let mut previous = None;
            for limit in [1, 5, 20, 100, 1000, 4000] {
                let current = iterations_to_escape(c, limit);
                if let Some(i) = previous {
                    assert_eq!(current, Some(i), "escape at {} changed for limit {}", c, limit);
                }
                if let Some(i) = current {
                    assert!(i < limit);
                }
                previous = current;
            }
        }
    }

    #[test]
    fn escapes_on_the_second_step() {
        // z1 = 1 + i, z2 = 1 + 3i.
        assert_eq!(iterations_to_escape(Complex::new(1.0, 1.0), 100), Some(1));
    }
}

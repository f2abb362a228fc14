// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic-bezier timing functions.
//!
//! An [`Easing`] is the CSS `cubic-bezier(x1, y1, x2, y2)` timing function:
//! a curve from `(0, 0)` to `(1, 1)` whose x axis is the elapsed fraction and
//! whose y axis is the eased output. Evaluating it means inverting `x(s)`,
//! which is done with a few Newton steps and a bisection fallback.

use kurbo::{CubicBez, ParamCurve, ParamCurveDeriv, Point};

/// Tolerance on the x axis when inverting the curve.
const EPSILON: f64 = 1e-7;

/// A cubic-bezier timing function with fixed endpoints `(0, 0)` and `(1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Easing {
    curve: CubicBez,
}

impl Easing {
    /// CSS `ease-in`: `cubic-bezier(0.42, 0, 1, 1)`.
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);

    /// The identity timing function.
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates a timing function from the two inner control points.
    ///
    /// `x1` and `x2` should lie in `[0, 1]` so the curve is a function of x.
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            curve: CubicBez {
                p0: Point::ZERO,
                p1: Point::new(x1, y1),
                p2: Point::new(x2, y2),
                p3: Point::new(1.0, 1.0),
            },
        }
    }

    /// Returns the inner control points `(x1, y1, x2, y2)`.
    #[inline]
    #[must_use]
    pub const fn control_points(&self) -> (f64, f64, f64, f64) {
        (
            self.curve.p1.x,
            self.curve.p1.y,
            self.curve.p2.x,
            self.curve.p2.y,
        )
    }

    /// Evaluates the timing function at elapsed fraction `x`.
    ///
    /// `x` is clamped to `[0, 1]`; the endpoints map exactly to 0 and 1.
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        if x.is_nan() || x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let s = self.solve_parameter(x);
        self.curve.eval(s).y.clamp(0.0, 1.0)
    }

    /// Finds the curve parameter `s` with `x(s) = x`.
    fn solve_parameter(&self, x: f64) -> f64 {
        let deriv = self.curve.deriv();
        let mut s = x;
        for _ in 0..8 {
            let err = self.curve.eval(s).x - x;
            if err.abs() < EPSILON {
                return s;
            }
            let slope = deriv.eval(s).x;
            if slope.abs() < 1e-6 {
                break;
            }
            s = (s - err / slope).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        s = x;
        for _ in 0..64 {
            let sx = self.curve.eval(s).x;
            if (sx - x).abs() < EPSILON {
                break;
            }
            if sx < x {
                lo = s;
            } else {
                hi = s;
            }
            s = 0.5 * (lo + hi);
        }
        s
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::EASE_IN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for easing in [Easing::EASE_IN, Easing::LINEAR] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
            assert_eq!(easing.apply(f64::NAN), 0.0);
        }
    }

    #[test]
    fn linear_is_identity() {
        for i in 1..10 {
            let x = f64::from(i) / 10.0;
            let y = Easing::LINEAR.apply(x);
            assert!((y - x).abs() < 1e-6, "linear({x}) = {y}");
        }
    }

    #[test]
    fn ease_in_starts_slow_and_is_monotonic() {
        let e = Easing::EASE_IN;
        assert!(e.apply(0.25) < 0.25, "ease-in should lag early on");
        let mut last = 0.0;
        for i in 1..=100 {
            let y = e.apply(f64::from(i) / 100.0);
            assert!(y >= last, "not monotonic at step {i}: {y} < {last}");
            last = y;
        }
    }

    #[test]
    fn ease_in_matches_reference_value() {
        // Browsers report roughly 0.315 for ease-in at the halfway point.
        let y = Easing::EASE_IN.apply(0.5);
        assert!((y - 0.3153).abs() < 1e-3, "ease-in(0.5) = {y}");
    }
}

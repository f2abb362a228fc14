// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 transform used for page placement.
//!
//! Page turns only need planar rigid motions (translation, rotation about
//! the Z axis, reflections across a line), but the matrix stays 4×4 so the
//! rendering adapter can hand it to CSS `matrix3d()` or a GPU uniform
//! unchanged.

use core::ops::Mul;

use kurbo::{Point, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a planar translation by `offset`.
    #[inline]
    #[must_use]
    pub const fn from_offset(offset: Vec2) -> Self {
        Self::from_translation(offset.x, offset.y, 0.0)
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    ///
    /// With a y-down screen coordinate system, positive angles turn
    /// clockwise.
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates the horizontal mirror `x ↦ width − x` of a page of the given
    /// width.
    #[inline]
    #[must_use]
    pub const fn mirror_x(width: f64) -> Self {
        Self {
            cols: [
                [-1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [width, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a planar reflection across the line through `anchor` with unit
    /// direction `dir`.
    ///
    /// `dir` must be normalized; the result is not a reflection otherwise.
    #[must_use]
    pub fn from_reflection(anchor: Point, dir: Vec2) -> Self {
        let xx = dir.x * dir.x - dir.y * dir.y;
        let xy = 2.0 * dir.x * dir.y;
        // Linear part [[xx, xy], [xy, -xx]]; translation keeps `anchor` fixed.
        let tx = anchor.x - (xx * anchor.x + xy * anchor.y);
        let ty = anchor.y - (xy * anchor.x - xx * anchor.y);
        Self {
            cols: [
                [xx, xy, 0.0, 0.0],
                [xy, -xx, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [tx, ty, 0.0, 1.0],
            ],
        }
    }

    /// Applies the transform to a planar point (z = 0).
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        let c = &self.cols;
        Point::new(
            c[0][0] * p.x + c[1][0] * p.y + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[3][1],
        )
    }

    /// Returns the planar translation component.
    #[inline]
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        Vec2::new(self.cols[3][0], self.cols[3][1])
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

/// `(sin, cos)` that works with and without `std`.
#[inline]
pub(crate) fn sin_cos(radians: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    let sc = radians.sin_cos();
    #[cfg(not(feature = "std"))]
    let sc = (radians.sin(), radians.cos());
    sc
}

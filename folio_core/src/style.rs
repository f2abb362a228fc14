// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint descriptions handed to the rendering adapter.
//!
//! A [`StyleRecord`] says where a surface goes (transform), which part of it
//! is visible (clip, in the surface's own coordinates), and which effects to
//! draw on top. Records are produced either statically from the surface's
//! slot ([`SlotLayout`](crate::surface::SlotLayout)) or per frame by the
//! [`geometry`](crate::geometry) functions while a page turns.

use kurbo::{Line, Point, Rect, Vec2};

use crate::transform::Transform3d;

/// The visible region of a surface, in surface-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A closed polygon of five vertices. Shapes with fewer corners repeat
    /// a vertex.
    Polygon([Point; 5]),
}

impl ClipShape {
    /// Returns the enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Rect(r) => r.area(),
            Self::Polygon(pts) => {
                let mut twice = 0.0;
                for (i, p) in pts.iter().enumerate() {
                    let q = pts[(i + 1) % pts.len()];
                    twice += p.x * q.y - q.x * p.y;
                }
                0.5 * twice.abs()
            }
        }
    }

    /// Returns the shape reflected by `x ↦ width − x`.
    ///
    /// Polygon vertices keep their order.
    #[must_use]
    pub fn mirrored(&self, width: f64) -> Self {
        match self {
            Self::Rect(r) => Self::Rect(Rect::new(width - r.x1, r.y0, width - r.x0, r.y1)),
            Self::Polygon(pts) => Self::Polygon(pts.map(|p| mirror_point(p, width))),
        }
    }

    /// Returns the vertices in drawing order.
    #[must_use]
    pub fn points(&self) -> [Point; 5] {
        match self {
            Self::Rect(r) => [
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x1, r.y1),
                Point::new(r.x0, r.y1),
                Point::new(r.x0, r.y0),
            ],
            Self::Polygon(pts) => *pts,
        }
    }
}

/// The shadow cast along the fold line onto the page beneath.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow intensity in `[0, 1]`.
    pub opacity: f64,
    /// The fold line, in the receiving surface's coordinates.
    pub line: Line,
}

/// The highlight band across a bending page.
///
/// A linear gradient along `from → to`; `band` is the position of the
/// brightest stop as a fraction of that axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shine {
    /// Start of the gradient axis (the page's outer edge).
    pub from: Point,
    /// End of the gradient axis (the spine).
    pub to: Point,
    /// Band position in `[0, 1]`.
    pub band: f64,
    /// Highlight opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Everything the rendering adapter needs to paint one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleRecord {
    /// Surface-local to spread coordinates.
    pub transform: Transform3d,
    /// Visible region in surface-local coordinates.
    pub clip: ClipShape,
    /// Surface opacity.
    pub opacity: f64,
    /// Fold shadow, if any.
    pub shadow: Option<Shadow>,
    /// Bending highlight, if any.
    pub shine: Option<Shine>,
    /// Stacking order; higher paints on top.
    pub z: i32,
}

impl StyleRecord {
    /// A fully visible, unfolded page of `size` at `origin`.
    #[must_use]
    pub fn resting(origin: Vec2, size: kurbo::Size) -> Self {
        Self {
            transform: Transform3d::from_offset(origin),
            clip: ClipShape::Rect(size.to_rect()),
            opacity: 1.0,
            shadow: None,
            shine: None,
            z: 0,
        }
    }

    /// Returns the record moved by `origin` in spread coordinates.
    ///
    /// Clip, shadow and shine are surface-local and stay unchanged.
    #[must_use]
    pub fn placed_at(self, origin: Vec2) -> Self {
        Self {
            transform: Transform3d::from_offset(origin) * self.transform,
            ..self
        }
    }
}

/// Reflects a point by `x ↦ width − x`.
#[inline]
#[must_use]
pub fn mirror_point(p: Point, width: f64) -> Point {
    Point::new(width - p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    #[test]
    fn polygon_area_handles_repeated_vertices() {
        let tri = ClipShape::Polygon([
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 3.0),
        ]);
        assert!((tri.area() - 6.0).abs() < 1e-12, "area {}", tri.area());
    }

    #[test]
    fn mirroring_preserves_area() {
        let rect = ClipShape::Rect(Rect::new(10.0, 0.0, 30.0, 50.0));
        let m = rect.mirrored(100.0);
        assert_eq!(m, ClipShape::Rect(Rect::new(70.0, 0.0, 90.0, 50.0)));
        assert_eq!(m.area(), rect.area());
    }

    #[test]
    fn placed_at_prepends_translation() {
        let r = StyleRecord::resting(Vec2::new(5.0, 0.0), Size::new(10.0, 20.0));
        let moved = r.placed_at(Vec2::new(100.0, 1.0));
        assert_eq!(moved.transform.translation(), Vec2::new(105.0, 1.0));
        assert_eq!(moved.clip, r.clip);
        assert_eq!(moved.clip.points()[2], Point::new(10.0, 20.0));
    }
}

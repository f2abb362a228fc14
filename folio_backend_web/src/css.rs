// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS value formatting for style records.
//!
//! Pure string builders, kept apart from the DOM calls so they can be tested
//! off the browser.

use alloc::format;
use alloc::string::String;

use kurbo::{Point, Size, Vec2};

use folio_core::style::{ClipShape, Shadow, Shine};
use folio_core::transform::Transform3d;

/// Width of the shadow band, as a fraction of the gradient line.
const SHADOW_SPREAD: f64 = 0.12;

/// Half-width of the shine band, as a fraction of the gradient line.
const SHINE_SPREAD: f64 = 0.08;

/// Formats a transform as a CSS `matrix3d()` value (column-major).
#[must_use]
pub fn matrix3d(xf: &Transform3d) -> String {
    let c0 = xf.col(0);
    let c1 = xf.col(1);
    let c2 = xf.col(2);
    let c3 = xf.col(3);

    format!(
        "matrix3d({},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{})",
        c0[0],
        c0[1],
        c0[2],
        c0[3],
        c1[0],
        c1[1],
        c1[2],
        c1[3],
        c2[0],
        c2[1],
        c2[2],
        c2[3],
        c3[0],
        c3[1],
        c3[2],
        c3[3],
    )
}

/// Formats a clip shape as a `clip-path: polygon(...)` value.
#[must_use]
pub fn clip_path(clip: &ClipShape) -> String {
    let mut css = String::from("polygon(");
    for (i, p) in clip.points().iter().enumerate() {
        if i > 0 {
            css.push_str(", ");
        }
        css.push_str(&format!("{}px {}px", p.x, p.y));
    }
    css.push(')');
    css
}

/// Formats the fold shadow as a `linear-gradient` that is darkest on the fold
/// line and fades out towards `toward` (a point inside the receiving page).
///
/// Returns `None` for a degenerate fold line.
#[must_use]
pub fn shadow_gradient(shadow: &Shadow, toward: Point, size: Size) -> Option<String> {
    let along = shadow.line.p1 - shadow.line.p0;
    let mut normal = unit(Vec2::new(-along.y, along.x))?;
    if normal.dot(toward - shadow.line.p0) < 0.0 {
        normal = -normal;
    }
    let axis = GradientAxis::new(normal, size);
    let start = axis.percent_at(shadow.line.p0);
    Some(format!(
        "linear-gradient({:.2}deg, rgba(0,0,0,{:.3}) {:.2}%, rgba(0,0,0,0) {:.2}%)",
        axis.degrees,
        shadow.opacity,
        start,
        start + SHADOW_SPREAD * 100.0,
    ))
}

/// Formats the bending shine as a `linear-gradient` with a white band at
/// `shine.band` along the `from → to` axis.
///
/// Returns `None` when the axis is degenerate.
#[must_use]
pub fn shine_gradient(shine: &Shine, size: Size) -> Option<String> {
    let axis = GradientAxis::new(unit(shine.to - shine.from)?, size);
    let band = shine.from.lerp(shine.to, shine.band);
    let at = axis.percent_at(band);
    let spread = SHINE_SPREAD * 100.0;
    Some(format!(
        "linear-gradient({:.2}deg, rgba(255,255,255,0) {:.2}%, \
         rgba(255,255,255,{:.3}) {:.2}%, rgba(255,255,255,0) {:.2}%)",
        axis.degrees,
        at - spread,
        shine.opacity,
        at,
        at + spread,
    ))
}

/// Mean of a clip's vertices; a point inside any of the convex fold shapes.
#[must_use]
pub fn clip_center(clip: &ClipShape) -> Point {
    let pts = clip.points();
    let sum = pts.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / pts.len() as f64).to_point()
}

fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.length();
    (len > 1e-9 && len.is_finite()).then(|| v / len)
}

/// The gradient line CSS derives for an angle inside a `size` box.
struct GradientAxis {
    /// CSS angle: 0° points up, clockwise.
    degrees: f64,
    direction: Vec2,
    center: Point,
    length: f64,
}

impl GradientAxis {
    fn new(direction: Vec2, size: Size) -> Self {
        Self {
            degrees: Vec2::new(-direction.y, direction.x).atan2().to_degrees(),
            direction,
            center: Point::new(0.5 * size.width, 0.5 * size.height),
            length: (size.width * direction.x).abs() + (size.height * direction.y).abs(),
        }
    }

    /// Position of the projection of `p` on the gradient line, in percent.
    fn percent_at(&self, p: Point) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        ((p - self.center).dot(self.direction) / self.length + 0.5) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Line, Rect};

    const PAGE: Size = Size::new(400.0, 600.0);

    #[test]
    fn identity_matrix() {
        assert_eq!(
            matrix3d(&Transform3d::IDENTITY),
            "matrix3d(1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1)"
        );
    }

    #[test]
    fn translation_lands_in_last_column() {
        let css = matrix3d(&Transform3d::from_translation(400.0, 0.0, 0.0));
        assert!(css.ends_with(",400,0,0,1)"), "got: {css}");
    }

    #[test]
    fn rect_clip_is_a_closed_polygon() {
        let css = clip_path(&ClipShape::Rect(Rect::new(0.0, 0.0, 400.0, 600.0)));
        assert_eq!(
            css,
            "polygon(0px 0px, 400px 0px, 400px 600px, 0px 600px, 0px 0px)"
        );
    }

    #[test]
    fn horizontal_shine_runs_left_to_right() {
        let shine = Shine {
            from: Point::new(0.0, 300.0),
            to: Point::new(400.0, 300.0),
            band: 0.25,
            opacity: 0.75,
        };
        let css = shine_gradient(&shine, PAGE).unwrap();
        assert!(css.starts_with("linear-gradient(90.00deg"), "got: {css}");
        assert!(css.contains("rgba(255,255,255,0.750) 25.00%"), "got: {css}");
    }

    #[test]
    fn shadow_fades_toward_the_page() {
        // A vertical fold at x = 100; the page lies to its right.
        let shadow = Shadow {
            opacity: 0.5,
            line: Line::new((100.0, 600.0), (100.0, 0.0)),
        };
        let css = shadow_gradient(&shadow, Point::new(300.0, 300.0), PAGE).unwrap();
        assert!(css.starts_with("linear-gradient(90.00deg"), "got: {css}");
        assert!(css.contains("rgba(0,0,0,0.500) 25.00%"), "got: {css}");

        let flipped = shadow_gradient(&shadow, Point::new(50.0, 300.0), PAGE).unwrap();
        assert!(
            flipped.starts_with("linear-gradient(-90.00deg"),
            "got: {flipped}"
        );
    }

    #[test]
    fn degenerate_axes_yield_none() {
        let shadow = Shadow {
            opacity: 0.5,
            line: Line::new((10.0, 10.0), (10.0, 10.0)),
        };
        assert!(shadow_gradient(&shadow, Point::ZERO, PAGE).is_none());
        let shine = Shine {
            from: Point::ZERO,
            to: Point::ZERO,
            band: 0.5,
            opacity: 1.0,
        };
        assert!(shine_gradient(&shine, PAGE).is_none());
    }

    #[test]
    fn center_of_rect_clip() {
        let c = clip_center(&ClipShape::Rect(Rect::new(0.0, 0.0, 400.0, 600.0)));
        // The closing vertex repeats the first, pulling the mean towards it.
        assert!(c.x > 0.0 && c.x < 400.0 && c.y > 0.0 && c.y < 600.0, "{c:?}");
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-turn geometry.
//!
//! Everything here is a pure function of the progression `t ∈ [0, 1]`, the
//! page size and the [`Turn`]. All coordinates are in the frame of the
//! *turning* page: `(0, 0)` is its top-left corner, y grows downwards.
//!
//! The turning page is folded along a line that starts at the bottom edge,
//! `x_offset = t · w` in from the outer corner, and rises towards the spine at
//! half the [fold angle](FoldShape::angle). The part of the leaf beyond the
//! line is flipped over onto the spine side; its back is the *revealed* page.
//!
//! ```text
//!   spine                    outer          TowardLeft: spine at x = 0
//!     ┌─────────────────────┬────┐
//!     │                     │ ╱  exit
//!     │     turning         │╱   │
//!     │                    ╱│    │
//!     └───────────────────A─┴────┘
//!                         ◄─ x_offset
//! ```
//!
//! [`Turn::TowardRight`] is computed from the same formulas with the spine on
//! the right, which makes it the exact mirror image under `x ↦ w − x`.

use kurbo::{Line, Point, Size, Vec2};

use crate::flip::Role;
use crate::style::{ClipShape, Shadow, Shine, StyleRecord, mirror_point};
use crate::transform::{Transform3d, sin_cos};

/// Below this, `sin(angle / 2)` is treated as zero (vertical fold line).
const FLAT_EPSILON: f64 = 1e-9;

/// Which way the turning page travels across the spread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    /// The right-hand page swings over to the left.
    TowardLeft,
    /// The left-hand page swings over to the right.
    TowardRight,
}

impl Turn {
    /// Returns the other turn.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::TowardLeft => Self::TowardRight,
            Self::TowardRight => Self::TowardLeft,
        }
    }

    /// `+1` for [`TowardLeft`](Self::TowardLeft), `-1` otherwise.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::TowardLeft => 1.0,
            Self::TowardRight => -1.0,
        }
    }
}

/// Fold angle profile.
///
/// The corner lifts at the full angle, holds it until `breakpoint`, then
/// flattens linearly until the page lies down at `t = 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldShape {
    /// Maximum fold angle in radians.
    pub max_angle: f64,
    /// Progression at which the angle starts to decay.
    pub breakpoint: f64,
}

impl FoldShape {
    /// 30° held until 15% progression.
    pub const DEFAULT: Self = Self {
        max_angle: core::f64::consts::FRAC_PI_6,
        breakpoint: 0.15,
    };

    /// Returns the fold angle at progression `t`.
    #[must_use]
    pub fn angle(&self, t: f64) -> f64 {
        let t = clamp_progression(t);
        if t <= self.breakpoint || self.breakpoint >= 1.0 {
            self.max_angle
        } else {
            self.max_angle * (1.0 - t) / (1.0 - self.breakpoint)
        }
    }
}

impl Default for FoldShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The fold line of a turning page at one progression value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fold {
    /// Clamped progression.
    pub progression: f64,
    /// Fold angle in radians.
    pub angle: f64,
    /// Distance of the fold's bottom anchor from the outer edge.
    pub x_offset: f64,
    /// Height at which the fold meets the outer edge: `h − x_offset · cot(a/2)`.
    ///
    /// Negative when the fold leaves through the top edge instead, and
    /// `-∞` once the fold is vertical.
    pub y_offset: f64,
    /// Where the fold line meets the bottom edge.
    pub anchor: Point,
    /// Unit direction of the fold line, pointing upwards from `anchor`.
    pub direction: Vec2,
    /// Where the fold line leaves the page (outer or top edge).
    pub exit: Point,
    /// Whether `exit` lies on the outer edge.
    pub exits_outer: bool,
}

/// Style records for the surfaces taking part in one turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipStyles {
    /// The page being turned (spine-side part still lying flat).
    pub turning: StyleRecord,
    /// The page printed on the back of the leaf.
    pub revealed: StyleRecord,
    /// The page uncovered underneath the leaf.
    pub underneath: StyleRecord,
}

impl FlipStyles {
    /// Returns all records moved by `origin` (the turning page's position in
    /// the spread).
    #[must_use]
    pub fn placed_at(self, origin: Vec2) -> Self {
        Self {
            turning: self.turning.placed_at(origin),
            revealed: self.revealed.placed_at(origin),
            underneath: self.underneath.placed_at(origin),
        }
    }

    /// The record for a participant role.
    #[must_use]
    pub fn get(&self, role: Role) -> StyleRecord {
        match role {
            Role::Turning => self.turning,
            Role::Revealed => self.revealed,
            Role::Underneath => self.underneath,
        }
    }
}

/// Clamps a progression to `[0, 1]`, mapping NaN to 0.
#[inline]
#[must_use]
pub fn clamp_progression(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Computes the fold line for progression `t`.
#[must_use]
pub fn fold(t: f64, page: Size, turn: Turn, shape: &FoldShape) -> Fold {
    let t = clamp_progression(t);
    let (w, h) = (page.width.max(0.0), page.height.max(0.0));
    let s = turn.sign();
    let outer = outer_edge(w, turn);

    let angle = shape.angle(t);
    let x_offset = t * w;
    let (sin, cos) = sin_cos(angle * 0.5);
    let anchor = Point::new(outer - s * x_offset, h);
    let direction = Vec2::new(s * sin, -cos);

    let y_offset = if sin > FLAT_EPSILON {
        h - x_offset * cos / sin
    } else if x_offset > 0.0 {
        f64::NEG_INFINITY
    } else {
        h
    };

    let (exit, exits_outer) = if y_offset >= 0.0 {
        (Point::new(outer, y_offset), true)
    } else {
        let run = if cos > FLAT_EPSILON { h * sin / cos } else { 0.0 };
        (Point::new(anchor.x + s * run, 0.0), false)
    };

    Fold {
        progression: t,
        angle,
        x_offset,
        y_offset,
        anchor,
        direction,
        exit,
        exits_outer,
    }
}

/// Computes the style records of a turn at progression `t`.
///
/// At `t = 0` the turning page is whole and nothing else shows; at `t = 1`
/// the turning page is fully clipped away, and the revealed page sits one
/// page width over on the far side of the spine.
#[must_use]
pub fn styles(t: f64, page: Size, turn: Turn, shape: &FoldShape) -> FlipStyles {
    let f = fold(t, page, turn, shape);
    let (w, h) = (page.width.max(0.0), page.height.max(0.0));
    let outer = outer_edge(w, turn);
    let spine = w - outer;

    let turning_clip = if f.exits_outer {
        [
            Point::new(spine, 0.0),
            Point::new(outer, 0.0),
            f.exit,
            f.anchor,
            Point::new(spine, h),
        ]
    } else {
        [
            Point::new(spine, 0.0),
            f.exit,
            f.exit,
            f.anchor,
            Point::new(spine, h),
        ]
    };

    // The part of the leaf beyond the fold, in leaf coordinates.
    let folded = if f.exits_outer {
        [f.anchor, Point::new(outer, h), f.exit, f.exit, f.exit]
    } else {
        [
            f.anchor,
            Point::new(outer, h),
            Point::new(outer, 0.0),
            f.exit,
            f.exit,
        ]
    };
    let folded = ClipShape::Polygon(folded);

    // The back of the leaf is mirrored through the page, then flipped over
    // the fold line.
    let revealed_transform =
        Transform3d::from_reflection(f.anchor, f.direction) * Transform3d::mirror_x(w);
    let mid = 0.5 * h;

    let turning = StyleRecord {
        transform: Transform3d::IDENTITY,
        clip: ClipShape::Polygon(turning_clip),
        opacity: 1.0,
        shadow: None,
        shine: None,
        z: 1,
    };
    let revealed = StyleRecord {
        transform: revealed_transform,
        clip: folded.mirrored(w),
        opacity: 1.0,
        shadow: None,
        shine: Some(Shine {
            from: mirror_point(Point::new(outer, mid), w),
            to: mirror_point(Point::new(spine, mid), w),
            band: f.progression,
            opacity: 1.0 - f.progression,
        }),
        z: 2,
    };
    let underneath = StyleRecord {
        transform: Transform3d::IDENTITY,
        clip: folded,
        opacity: 1.0,
        shadow: Some(Shadow {
            opacity: shadow_opacity(f.progression),
            line: Line::new(f.anchor, f.exit),
        }),
        shine: None,
        z: 0,
    };

    FlipStyles {
        turning,
        revealed,
        underneath,
    }
}

/// Shadow intensity: 0.5 at rest, peaking at 0.8 halfway through.
#[must_use]
pub fn shadow_opacity(t: f64) -> f64 {
    let t = clamp_progression(t);
    0.5 + 0.3 * (1.0 - (2.0 * t - 1.0).abs())
}

#[inline]
fn outer_edge(width: f64, turn: Turn) -> f64 {
    match turn {
        Turn::TowardLeft => width,
        Turn::TowardRight => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: Size = Size::new(300.0, 400.0);
    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn steps() -> impl Iterator<Item = f64> {
        (0..=40).map(|i| f64::from(i) / 40.0)
    }

    fn styles_of(t: f64, turn: Turn) -> FlipStyles {
        styles(t, PAGE, turn, &FoldShape::DEFAULT)
    }

    fn assert_clip_mirrored(left: &ClipShape, right: &ClipShape, t: f64) {
        for (l, r) in left.points().iter().zip(right.points()) {
            assert!(
                close(mirror_point(*l, PAGE.width), r),
                "t={t}: {l:?} does not mirror to {r:?}"
            );
        }
    }

    #[test]
    fn fold_angle_profile() {
        let shape = FoldShape::DEFAULT;
        let max = shape.max_angle;
        assert_eq!(shape.angle(0.0), max);
        assert_eq!(shape.angle(0.15), max);
        assert_eq!(shape.angle(1.0), 0.0);
        assert!((shape.angle(0.575) - max * 0.5).abs() < EPS);
        assert_eq!(shape.angle(-1.0), max, "progression is clamped");
        assert_eq!(shape.angle(2.0), 0.0, "progression is clamped");
    }

    #[test]
    fn fold_line_meets_outer_edge_early() {
        let f = fold(0.1, PAGE, Turn::TowardLeft, &FoldShape::DEFAULT);
        let (sin, cos) = sin_cos(f.angle * 0.5);
        // tan((π − a) / 2) = cot(a / 2)
        let expected = PAGE.height - 30.0 * cos / sin;
        assert!(f.exits_outer, "fold should exit through the outer edge");
        assert!((f.y_offset - expected).abs() < EPS);
        assert!(close(f.exit, Point::new(PAGE.width, expected)));
        assert!(close(f.anchor, Point::new(270.0, PAGE.height)));
    }

    #[test]
    fn fold_line_leaves_through_top_later() {
        let f = fold(0.5, PAGE, Turn::TowardLeft, &FoldShape::DEFAULT);
        assert!(!f.exits_outer);
        assert!(f.y_offset < 0.0);
        assert_eq!(f.exit.y, 0.0);
        // The exit lies on the fold line.
        let along = f.exit - f.anchor;
        let cross = along.x * f.direction.y - along.y * f.direction.x;
        assert!(cross.abs() < 1e-6, "exit is off the fold line: {cross}");
    }

    #[test]
    fn styles_mirror_between_turns() {
        for t in steps() {
            let l = styles_of(t, Turn::TowardLeft);
            let r = styles_of(t, Turn::TowardRight);

            assert_clip_mirrored(&l.turning.clip, &r.turning.clip, t);
            assert_clip_mirrored(&l.revealed.clip, &r.revealed.clip, t);
            assert_clip_mirrored(&l.underneath.clip, &r.underneath.clip, t);

            for p in [
                Point::new(0.0, 0.0),
                Point::new(PAGE.width, 0.0),
                Point::new(120.0, 310.0),
            ] {
                let via_left = mirror_point(
                    l.revealed
                        .transform
                        .transform_point(mirror_point(p, PAGE.width)),
                    PAGE.width,
                );
                let via_right = r.revealed.transform.transform_point(p);
                assert!(
                    close(via_left, via_right),
                    "t={t}: revealed transform not mirrored at {p:?}"
                );
            }

            let (ls, rs) = (l.underneath.shadow.unwrap(), r.underneath.shadow.unwrap());
            assert_eq!(ls.opacity, rs.opacity);
            assert!(close(mirror_point(ls.line.p0, PAGE.width), rs.line.p0));
            assert!(close(mirror_point(ls.line.p1, PAGE.width), rs.line.p1));

            let (lh, rh) = (l.revealed.shine.unwrap(), r.revealed.shine.unwrap());
            assert_eq!((lh.band, lh.opacity), (rh.band, rh.opacity));
            assert!(close(mirror_point(lh.from, PAGE.width), rh.from));
            assert!(close(mirror_point(lh.to, PAGE.width), rh.to));
        }
    }

    #[test]
    fn resting_before_the_turn() {
        for turn in [Turn::TowardLeft, Turn::TowardRight] {
            let s = styles_of(0.0, turn);
            let full = PAGE.width * PAGE.height;
            assert!((s.turning.clip.area() - full).abs() < EPS, "{turn:?}");
            assert_eq!(s.turning.transform, Transform3d::IDENTITY);
            assert!(s.revealed.clip.area() < EPS, "{turn:?}");
            assert!(s.underneath.clip.area() < EPS, "{turn:?}");
        }
    }

    #[test]
    fn resting_after_the_turn() {
        for (turn, dx) in [(Turn::TowardLeft, -PAGE.width), (Turn::TowardRight, PAGE.width)] {
            let s = styles_of(1.0, turn);
            let full = PAGE.width * PAGE.height;
            assert!(s.turning.clip.area() < EPS, "{turn:?}");
            assert!((s.revealed.clip.area() - full).abs() < EPS, "{turn:?}");
            assert!((s.underneath.clip.area() - full).abs() < EPS, "{turn:?}");
            let p = Point::new(40.0, 70.0);
            assert!(
                close(s.revealed.transform.transform_point(p), p + Vec2::new(dx, 0.0)),
                "{turn:?}: revealed page should end one page over"
            );
            assert_eq!(s.revealed.shine.unwrap().opacity, 0.0);
            assert_eq!(s.underneath.shadow.unwrap().opacity, 0.5);
        }
    }

    #[test]
    fn revealed_page_hinges_on_the_fold() {
        for t in steps() {
            let f = fold(t, PAGE, Turn::TowardLeft, &FoldShape::DEFAULT);
            let s = styles_of(t, Turn::TowardLeft);
            let back_of_anchor = Point::new(f.x_offset, PAGE.height);
            assert!(close(s.revealed.transform.transform_point(back_of_anchor), f.anchor));
            // The linear part is a rotation by the fold angle.
            let (sin, cos) = sin_cos(f.angle);
            let c0 = s.revealed.transform.col(0);
            assert!((c0[0] - cos).abs() < EPS && (c0[1] - sin).abs() < EPS, "t={t}");
        }
    }

    #[test]
    fn clip_areas_add_up_to_a_page() {
        for t in steps() {
            let s = styles_of(t, Turn::TowardRight);
            let sum = s.turning.clip.area() + s.underneath.clip.area();
            assert!((sum - PAGE.width * PAGE.height).abs() < 1e-6, "t={t}: {sum}");
        }
    }

    #[test]
    fn shadow_peaks_halfway() {
        assert_eq!(shadow_opacity(0.0), 0.5);
        assert!((shadow_opacity(0.5) - 0.8).abs() < EPS);
        assert_eq!(shadow_opacity(1.0), 0.5);
        assert!((shadow_opacity(0.25) - shadow_opacity(0.75)).abs() < EPS);
    }

    #[test]
    fn unmeasured_page_is_degenerate_but_finite() {
        for t in steps() {
            let s = styles(t, Size::ZERO, Turn::TowardLeft, &FoldShape::DEFAULT);
            assert!(s.turning.transform.is_finite());
            assert!(s.revealed.transform.is_finite());
            assert!(s.turning.clip.points().iter().all(|p| p.is_finite()));
            assert!(s.revealed.clip.area().is_finite());
        }
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for content and rendering integrations.
//!
//! Folio does not load or paint content itself. A backend supplies:
//!
//! - **Content surfaces**: [`ContentSurface`] wraps one laid-out section
//!   (an iframe, a native text view, a rasterized page). A
//!   [`SurfaceLoader`] creates them on demand.
//!
//! - **Sections**: a [`SectionSequence`](crate::section::SectionSequence)
//!   describing the book's spine.
//!
//! - **Tick source**: produces [`FrameTick`](crate::timing::FrameTick) values
//!   from a platform mechanism (e.g. `requestAnimationFrame`) and feeds them
//!   to [`SpreadManager::tick`](crate::spread::SpreadManager::tick).
//!
//! - **Presenter**: implements [`Presenter`] to apply
//!   [`SpreadChanges`] to the native tree.
//!
//! # Crate boundaries
//!
//! `folio_core` owns the state machine, geometry, and this contract module.
//! Backend crates depend on `folio_core` and provide platform glue.
//! Application code wires them together in a frame loop.

use alloc::string::String;
use core::fmt;

use kurbo::{Point, Size, Vec2};

use crate::section::Section;
use crate::surface::{SpreadChanges, SurfaceCollection};

/// Measured size of a surface's laid-out body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyGeometry {
    /// Body width.
    pub width: f64,
    /// Body height.
    pub height: f64,
    /// Offset from the surface frame to the body's top-left corner.
    pub frame_to_body: Vec2,
}

impl BodyGeometry {
    /// The placeholder used until a surface has been measured.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
        frame_to_body: Vec2::ZERO,
    };

    /// Width and height as a [`Size`].
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether both dimensions are positive.
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// What to load into a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadRequest {
    /// The section to render.
    pub section: Section,
    /// The page size to lay out for.
    pub page: Size,
}

/// A content surface failed to load or render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The section's resource could not be obtained.
    Unavailable(usize),
    /// The content was obtained but could not be rendered.
    Render(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(index) => write!(f, "section {index} is unavailable"),
            Self::Render(reason) => write!(f, "render failed: {reason}"),
        }
    }
}

impl core::error::Error for LoadError {}

/// One renderable page of content.
pub trait ContentSurface {
    /// Loads and lays out the requested section.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the content cannot be loaded or rendered.
    fn render(&mut self, request: &LoadRequest) -> Result<(), LoadError>;

    /// Current frame width.
    ///
    /// Together with [`height`](Self::height) this is compared with the page
    /// size on relayout; a mismatch triggers [`resize`](Self::resize).
    fn width(&self) -> f64;

    /// Current frame height.
    fn height(&self) -> f64;

    /// Position of a target (fragment, CFI, …) inside the content, if found.
    fn location_of(&self, target: &str) -> Option<Point>;

    /// Makes the surface visible.
    fn show(&mut self);

    /// Hides the surface.
    fn hide(&mut self);

    /// Measures the laid-out body; `None` while layout has not happened yet.
    fn body_geometry(&self) -> Option<BodyGeometry>;

    /// Lays the content out for a new page size.
    fn resize(&mut self, page: Size);

    /// Scrolls the content so that `offset` is at the top-left.
    fn scroll_to(&mut self, offset: Point);
}

/// Creates content surfaces for sections.
pub trait SurfaceLoader {
    /// The surface type produced.
    type Surface: ContentSurface;

    /// Creates an empty surface for `section`; the caller renders it.
    fn create(&mut self, section: &Section) -> Self::Surface;
}

/// Applies evaluated spread changes to a platform-native presentation tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(tick: FrameTick) {
///     // Advance the in-flight flip, if any.
///     spread.tick(&tick, &mut tracer);
///
///     // Load at most one staged page while idle.
///     spread.pump_prefetch(&mut tracer);
///
///     // Drain dirty channels and paint the differences.
///     let changes = spread.evaluate();
///     presenter.apply(spread.surfaces(), &changes);
/// }
/// ```
pub trait Presenter<S> {
    /// Applies the given [`SpreadChanges`], reading current styles from
    /// `surfaces` as needed.
    fn apply(&mut self, surfaces: &SurfaceCollection<S>, changes: &SpreadChanges);
}

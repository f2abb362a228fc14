// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory backend doubles shared by the unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};

use crate::backend::{
    BodyGeometry, ContentSurface, LoadError, LoadRequest, Presenter, SurfaceLoader,
};
use crate::flip::{Slot, SurfaceState};
use crate::section::Section;
use crate::surface::{SpreadChanges, SpreadLayout, Surface, SurfaceCollection};

/// Viewport used throughout the tests: two 400×600 pages.
pub(crate) const VIEWPORT: Size = Size::new(800.0, 600.0);

/// Page size matching [`VIEWPORT`].
pub(crate) const PAGE: Size = Size::new(400.0, 600.0);

/// Target that [`MockSurface::location_of`] resolves.
pub(crate) const KNOWN_TARGET: &str = "#chapter-start";

#[derive(Debug)]
pub(crate) struct MockSurface {
    pub(crate) section: usize,
    pub(crate) fail: bool,
    pub(crate) page: Size,
    pub(crate) geometry: Option<BodyGeometry>,
    pub(crate) visible: bool,
    pub(crate) scrolled_to: Option<Point>,
    pub(crate) resizes: u32,
}

impl MockSurface {
    pub(crate) fn new(section: usize) -> Self {
        Self {
            section,
            fail: false,
            page: Size::ZERO,
            geometry: None,
            visible: false,
            scrolled_to: None,
            resizes: 0,
        }
    }

    /// A surface that already went through a successful render.
    pub(crate) fn rendered(section: usize, page: Size) -> Self {
        let mut s = Self::new(section);
        s.page = page;
        s.geometry = Some(measured(page));
        s
    }
}

fn measured(page: Size) -> BodyGeometry {
    BodyGeometry {
        width: page.width,
        height: page.height,
        frame_to_body: Vec2::ZERO,
    }
}

impl ContentSurface for MockSurface {
    fn render(&mut self, request: &LoadRequest) -> Result<(), LoadError> {
        if self.fail {
            return Err(LoadError::Render(String::from("mock failure")));
        }
        self.page = request.page;
        self.geometry = Some(measured(request.page));
        Ok(())
    }

    fn width(&self) -> f64 {
        self.page.width
    }

    fn height(&self) -> f64 {
        self.page.height
    }

    fn location_of(&self, target: &str) -> Option<Point> {
        (target == KNOWN_TARGET).then_some(Point::new(0.0, 1200.0))
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn body_geometry(&self) -> Option<BodyGeometry> {
        self.geometry
    }

    fn resize(&mut self, page: Size) {
        self.page = page;
        self.resizes += 1;
        if self.geometry.is_some() {
            self.geometry = Some(measured(page));
        }
    }

    fn scroll_to(&mut self, offset: Point) {
        self.scrolled_to = Some(offset);
    }
}

#[derive(Debug, Default)]
pub(crate) struct MockLoader {
    pub(crate) created: Vec<usize>,
    pub(crate) failing: Vec<usize>,
}

impl SurfaceLoader for MockLoader {
    type Surface = MockSurface;

    fn create(&mut self, section: &Section) -> MockSurface {
        self.created.push(section.index);
        let mut surface = MockSurface::new(section.index);
        surface.fail = self.failing.contains(&section.index);
        surface
    }
}

/// A book of `len` plain sections.
pub(crate) fn book(len: usize) -> Vec<Section> {
    (0..len).map(Section::new).collect()
}

/// A full window of rendered surfaces, sections `first..first + 6` from
/// `Prev2` to `Next2`, laid out for [`PAGE`].
pub(crate) fn window(first: usize, layout: &SpreadLayout) -> SurfaceCollection<MockSurface> {
    let mut surfaces = SurfaceCollection::new();
    for (offset, slot) in Slot::ALL.into_iter().enumerate() {
        let section = first + offset;
        let id = surfaces.push_back(Surface::new(
            Section::new(section),
            SurfaceState::resting(slot),
            MockSurface::rendered(section, layout.page),
        ));
        surfaces.set_layout(id, layout.slot_layout(slot));
        surfaces.set_geometry(id, measured(layout.page));
    }
    surfaces
}

/// Section index and state of every surface, in document order.
pub(crate) fn snapshot<S>(surfaces: &SurfaceCollection<S>) -> Vec<(usize, SurfaceState)> {
    surfaces
        .iter()
        .map(|(_, s)| (s.section().index, s.state()))
        .collect()
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPresenter {
    pub(crate) batches: Vec<SpreadChanges>,
    pub(crate) painted: Vec<(usize, crate::style::StyleRecord)>,
}

impl<S> Presenter<S> for RecordingPresenter {
    fn apply(&mut self, surfaces: &SurfaceCollection<S>, changes: &SpreadChanges) {
        for &idx in changes.styles.iter().chain(&changes.layouts) {
            if let Some(surface) = surfaces.at(idx) {
                self.painted
                    .push((surface.section().index, surface.effective_style()));
            }
        }
        self.batches.push(changes.clone());
    }
}

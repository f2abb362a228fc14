// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The spread manager: public entry point of the page-turn subsystem.
//!
//! [`SpreadManager`] owns the surface collection, the animation driver and
//! the prefetch queue, and wires them together:
//!
//! ```text
//!   display / next / prev / handle_gesture
//!       │
//!       ▼
//!   AnimationDriver ──► flip table ──► geometry ──► SurfaceCollection
//!       │                                                │
//!       ▼ (settle)                                       ▼
//!   retire + relayout ──► IdleSignal            evaluate() ──► Presenter
//!       │
//!       ▼
//!   PrefetchManager::request ··· pump_prefetch ──► SurfaceLoader
//! ```
//!
//! The host drives it from three places: [`tick`](SpreadManager::tick) on
//! every frame, [`handle_gesture`](SpreadManager::handle_gesture) from
//! pointer callbacks, and [`pump_prefetch`](SpreadManager::pump_prefetch)
//! from an idle callback.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Size;

use crate::backend::{BodyGeometry, ContentSurface, LoadError, LoadRequest, Presenter, SurfaceLoader};
use crate::config::{FlipConfig, LayoutMode};
use crate::driver::{AnimationDriver, FlipMode, Settle, SettleOutcome};
use crate::flip::{FlipDirection, Slot, SurfaceState};
use crate::gesture::GestureEvent;
use crate::idle::{CurrentLocation, IdleSignal, SpreadLocation};
use crate::prefetch::{PrefetchManager, PumpResult};
use crate::section::{Section, SectionSequence};
use crate::surface::{SpreadChanges, SpreadLayout, Surface, SurfaceCollection, SurfaceId};
use crate::time::HostTime;
use crate::timing::FrameTick;
use crate::trace::{DisplayEvent, DisplayStatus, GestureTraceEvent, Tracer};

/// Why a [`SpreadManager::display`] call failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayError {
    /// A flip is in flight.
    Busy,
    /// The book has no such section.
    NoSuchSection(usize),
    /// A page of the new spread failed to load; the spread is now empty.
    Load(LoadError),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("a page turn is in progress"),
            Self::NoSuchSection(index) => write!(f, "no section {index}"),
            Self::Load(err) => write!(f, "failed to load spread: {err}"),
        }
    }
}

impl core::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoadError> for DisplayError {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

/// Two-page spread of a book, with page turns.
pub struct SpreadManager<L: SurfaceLoader, Q: SectionSequence> {
    config: FlipConfig,
    sections: Q,
    loader: L,
    surfaces: SurfaceCollection<L::Surface>,
    layout: SpreadLayout,
    driver: AnimationDriver,
    prefetch: PrefetchManager,
    idle: IdleSignal,
    /// Section index on (or that would be on) the left readable slot.
    anchor: Option<isize>,
}

impl<L, Q> fmt::Debug for SpreadManager<L, Q>
where
    L: SurfaceLoader,
    Q: SectionSequence,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpreadManager")
            .field("surfaces", &self.surfaces.len())
            .field("layout", &self.layout)
            .field("anchor", &self.anchor)
            .field("flipping", &self.driver.is_active())
            .field("queued", &self.prefetch.len())
            .finish_non_exhaustive()
    }
}

impl<L, Q> SpreadManager<L, Q>
where
    L: SurfaceLoader,
    Q: SectionSequence,
{
    /// Creates an empty spread for a viewport of `viewport.0 × viewport.1`.
    #[must_use]
    pub fn new(config: FlipConfig, sections: Q, loader: L, viewport: (f64, f64)) -> Self {
        Self {
            layout: SpreadLayout::from_viewport(viewport.0, viewport.1, config.reading),
            config,
            sections,
            loader,
            surfaces: SurfaceCollection::new(),
            driver: AnimationDriver::new(config),
            prefetch: PrefetchManager::new(),
            idle: IdleSignal::new(),
            anchor: None,
        }
    }

    // -- Accessors --

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    /// The book.
    #[must_use]
    pub fn sections(&self) -> &Q {
        &self.sections
    }

    /// The surface loader.
    #[must_use]
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The loaded surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &SurfaceCollection<L::Surface> {
        &self.surfaces
    }

    /// Current page layout.
    #[must_use]
    pub fn layout(&self) -> &SpreadLayout {
        &self.layout
    }

    /// The animation driver.
    #[must_use]
    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    /// The prefetch queue.
    #[must_use]
    pub fn prefetch(&self) -> &PrefetchManager {
        &self.prefetch
    }

    /// Section index on the left readable slot; negative while the cover is
    /// shown. `None` before the first successful display.
    #[must_use]
    pub fn anchor(&self) -> Option<isize> {
        self.anchor
    }

    /// Whether a flip is in flight.
    #[must_use]
    pub fn is_flipping(&self) -> bool {
        self.driver.is_active()
    }

    // -- Navigation --

    /// Shows the spread containing section `index`.
    ///
    /// When the section is already readable in a reflowable book, the view
    /// seeks to `target` inside it. Otherwise the spread is rebuilt: the
    /// section goes alone on the right if it is the cover or a pre-paginated
    /// page marked for the right, and on the left next to its successor
    /// otherwise. Neighbouring pages are queued for prefetching.
    ///
    /// # Errors
    ///
    /// [`DisplayError::Busy`] while a flip is in flight (nothing changes),
    /// [`DisplayError::NoSuchSection`] for an index past the end, and
    /// [`DisplayError::Load`] when a page fails to load, in which case the
    /// spread is left empty.
    pub fn display(
        &mut self,
        index: usize,
        target: Option<&str>,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), DisplayError> {
        if self.driver.is_active() {
            tracer.display(&DisplayEvent {
                section: index,
                status: DisplayStatus::Refused,
            });
            return Err(DisplayError::Busy);
        }
        let section = self
            .sections
            .get(index)
            .ok_or(DisplayError::NoSuchSection(index))?;

        if self.config.layout == LayoutMode::Reflowable {
            let readable = self
                .surfaces
                .find_by_section(index)
                .filter(|&id| self.surfaces.state(id).is_readable_resting());
            if let Some(id) = readable {
                self.seek(id, target);
                self.idle.settle(self.location());
                tracer.display(&DisplayEvent {
                    section: index,
                    status: DisplayStatus::Seeked,
                });
                return Ok(());
            }
        }

        match self.rebuild(section, target) {
            Ok(()) => {
                tracer.display(&DisplayEvent {
                    section: index,
                    status: DisplayStatus::Built,
                });
                if let Some(anchor) = self.anchor {
                    self.prefetch
                        .request(anchor, &self.sections, &self.surfaces, tracer);
                }
                Ok(())
            }
            Err(err) => {
                tracer.display(&DisplayEvent {
                    section: index,
                    status: DisplayStatus::Failed,
                });
                Err(err.into())
            }
        }
    }

    /// Starts a timed flip to the next spread. Returns whether it started.
    pub fn next(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> bool {
        self.start(FlipDirection::Forward, now, tracer)
    }

    /// Starts a timed flip to the previous spread. Returns whether it started.
    pub fn prev(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> bool {
        self.start(FlipDirection::Backward, now, tracer)
    }

    /// Feeds one pointer gesture. Returns whether it had an effect.
    ///
    /// A drag start begins a gestural flip in the direction the page is
    /// pulled; moves update it; the end releases it. A swipe during a drag
    /// in the same direction makes the release complete the flip; a swipe
    /// outside a drag starts a timed flip.
    pub fn handle_gesture(
        &mut self,
        event: GestureEvent,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let reading = self.config.reading;
        let handled = match event {
            GestureEvent::DragStart { turn, x } => {
                let direction = FlipDirection::from_turn(turn, reading);
                let started = self
                    .driver
                    .begin_gesture(
                        direction,
                        x,
                        now,
                        &mut self.surfaces,
                        &self.layout,
                        tracer,
                    )
                    .is_ok();
                if started {
                    self.idle.set_busy();
                    self.sync_visibility();
                }
                started
            }
            GestureEvent::DragMove { x } => {
                self.driver
                    .update_gesture(x, now, &mut self.surfaces, tracer)
            }
            GestureEvent::DragEnd => {
                let dragging = self
                    .driver
                    .current()
                    .is_some_and(|t| t.mode() == FlipMode::Gestural);
                if let Some(settle) =
                    self.driver
                        .release_gesture(now, &mut self.surfaces, tracer)
                {
                    self.finish_settle(settle, tracer);
                }
                dragging
            }
            GestureEvent::Swipe(turn) => {
                let direction = FlipDirection::from_turn(turn, reading);
                self.driver.swipe(direction)
                    || (!self.driver.is_active() && self.start(direction, now, tracer))
            }
        };
        tracer.gesture(&GestureTraceEvent {
            kind: event.kind(),
            at: now,
            x: event.x(),
            progression: self.driver.current().map(|t| t.progression()),
        });
        handled
    }

    /// Advances the in-flight flip to the tick's time.
    ///
    /// Returns the outcome when the flip settled on this frame.
    pub fn tick(&mut self, tick: &FrameTick, tracer: &mut Tracer<'_>) -> Option<SettleOutcome> {
        let settle = self.driver.tick(tick.now, &mut self.surfaces, tracer)?;
        let outcome = settle.outcome;
        self.finish_settle(settle, tracer);
        Some(outcome)
    }

    /// Runs one step of the prefetch queue.
    pub fn pump_prefetch(&mut self, tracer: &mut Tracer<'_>) -> PumpResult {
        let Some(anchor) = self.anchor else {
            return PumpResult::Idle;
        };
        let result = self.prefetch.pump(
            anchor,
            self.driver.is_active(),
            &self.sections,
            &mut self.loader,
            &mut self.surfaces,
            &self.layout,
            tracer,
        );
        if matches!(result, PumpResult::Loaded(_)) {
            self.sync_visibility();
            self.idle.settle(self.location());
        }
        result
    }

    /// Adapts to a new viewport.
    ///
    /// Pages are relaid out, resized and re-measured for half the new width.
    /// Participants of an in-flight flip are left alone; they are resized
    /// when the flip settles.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.layout = SpreadLayout::from_viewport(width, height, self.config.reading);
        let participants = self.driver.current().map(|t| *t.participants());
        for id in self.surfaces.ids() {
            if participants.is_some_and(|p| p.contains(id)) {
                continue;
            }
            self.relayout(id);
        }
    }

    // -- Queries --

    /// Resolves to the spread location once no flip is in flight.
    pub fn current_location(&self) -> CurrentLocation {
        self.idle.wait()
    }

    /// Sections in the readable slots right now. During a flip this is still
    /// the spread the flip started from.
    #[must_use]
    pub fn location(&self) -> SpreadLocation {
        let section = |slot| {
            self.surfaces
                .find_slot(slot)
                .map(|id| self.surfaces.section_of(id))
        };
        SpreadLocation {
            left: section(Slot::ReadableLeft),
            right: section(Slot::ReadableRight),
        }
    }

    /// Whether `id` counts as visible: readable pages at rest while idle, and
    /// the flip participants while a flip is in flight.
    #[must_use]
    pub fn is_visible(&self, id: SurfaceId) -> bool {
        if !self.surfaces.contains(id) {
            return false;
        }
        let state = self.surfaces.state(id);
        if self.driver.is_active() {
            !state.is_resting()
        } else {
            state.is_readable_resting()
        }
    }

    // -- Rendering --

    /// Drains the collection's dirty state.
    pub fn evaluate(&mut self) -> SpreadChanges {
        self.surfaces.evaluate()
    }

    /// Evaluates and hands the changes to `presenter`, if there are any.
    pub fn present<P: Presenter<L::Surface>>(&mut self, presenter: &mut P) {
        let changes = self.surfaces.evaluate();
        if !changes.is_empty() {
            presenter.apply(&self.surfaces, &changes);
        }
    }

    // -- Internal helpers --

    fn start(&mut self, direction: FlipDirection, now: HostTime, tracer: &mut Tracer<'_>) -> bool {
        let started = self
            .driver
            .start_timed(direction, now, &mut self.surfaces, &self.layout, tracer)
            .is_ok();
        if started {
            self.idle.set_busy();
            self.sync_visibility();
        }
        started
    }

    fn finish_settle(&mut self, settle: Settle, tracer: &mut Tracer<'_>) {
        for id in settle.retired {
            self.surfaces.remove(id).into_content().hide();
        }
        if settle.outcome == SettleOutcome::Committed {
            self.anchor = self.anchor.map(|a| match settle.direction {
                FlipDirection::Forward => a + 2,
                FlipDirection::Backward => a - 2,
            });
        }
        for id in self.surfaces.ids() {
            self.relayout(id);
        }
        self.sync_visibility();
        self.idle.settle(self.location());
        if let Some(anchor) = self.anchor {
            self.prefetch
                .request(anchor, &self.sections, &self.surfaces, tracer);
        }
    }

    fn seek(&mut self, id: SurfaceId, target: Option<&str>) {
        let Some(target) = target else {
            return;
        };
        let content = self.surfaces.content_mut(id);
        if let Some(offset) = content.location_of(target) {
            content.scroll_to(offset);
        }
    }

    fn rebuild(&mut self, section: Section, target: Option<&str>) -> Result<(), LoadError> {
        self.prefetch.clear();
        for surface in self.surfaces.clear() {
            surface.into_content().hide();
        }
        self.anchor = None;

        let index = isize::try_from(section.index).map_err(|_| LoadError::Unavailable(section.index))?;
        let mut pages: Vec<(Section, Slot)> = Vec::with_capacity(2);
        let anchor = if section.forces_right(self.config.layout) {
            // The facing page, if any, completes the spread now; left empty
            // it would be filled by the next prefetch step.
            if let Some(prev) = self.sections.prev(&section) {
                pages.push((prev, Slot::ReadableLeft));
            }
            pages.push((section, Slot::ReadableRight));
            index - 1
        } else {
            pages.push((section, Slot::ReadableLeft));
            if let Some(next) = self.sections.next(&section) {
                pages.push((next, Slot::ReadableRight));
            }
            index
        };

        for (page, slot) in pages {
            if let Err(err) = self.load(page, slot) {
                for surface in self.surfaces.clear() {
                    surface.into_content().hide();
                }
                self.idle.settle(SpreadLocation::default());
                return Err(err);
            }
        }
        self.anchor = Some(anchor);

        if let Some(id) = self.surfaces.find_by_section(section.index) {
            self.seek(id, target);
        }
        self.sync_visibility();
        self.idle.settle(self.location());
        Ok(())
    }

    fn load(&mut self, section: Section, slot: Slot) -> Result<SurfaceId, LoadError> {
        let mut content = self.loader.create(&section);
        content.render(&LoadRequest {
            section,
            page: self.layout.page,
        })?;
        let geometry = content.body_geometry().unwrap_or(BodyGeometry::ZERO);
        let id = self
            .surfaces
            .insert(Surface::new(section, SurfaceState::resting(slot), content));
        self.surfaces.set_layout(id, self.layout.slot_layout(slot));
        self.surfaces.set_geometry(id, geometry);
        Ok(id)
    }

    /// Static layout for the surface's slot, plus a content resize and
    /// re-measure when the content's frame differs from the page size.
    fn relayout(&mut self, id: SurfaceId) {
        let page = self.layout.page;
        let slot = self.surfaces.state(id).slot;
        self.surfaces.set_layout(id, self.layout.slot_layout(slot));
        let content = self.surfaces.content_mut(id);
        if Size::new(content.width(), content.height()) == page {
            return;
        }
        content.resize(page);
        let geometry = content.body_geometry().unwrap_or(BodyGeometry::ZERO);
        self.surfaces.set_geometry(id, geometry);
    }

    /// Shows rendered surfaces and hides staged ones.
    fn sync_visibility(&mut self) {
        for id in self.surfaces.ids() {
            let Some(surface) = self.surfaces.get(id) else {
                continue;
            };
            let want = surface.state().is_rendered();
            if surface.is_visible() == want {
                continue;
            }
            let content = self.surfaces.content_mut(id);
            if want {
                content.show();
            } else {
                content.hide();
            }
            self.surfaces.set_visible(id, want);
        }
    }
}

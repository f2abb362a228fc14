// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serial loading of the pages around the spread.
//!
//! The window holds two staged pages on each side of the spread. Whenever the
//! spread moves, [`PrefetchManager::request`] queues every section whose slot
//! is empty; [`PrefetchManager::pump`] then loads at most one of them per
//! call, so loads never overlap and never run while a flip is in flight.
//!
//! Slots are derived from the *anchor*: the (possibly negative) section index
//! that sits, or would sit, on the left readable slot. A popped job is
//! re-checked against the current anchor, so work queued for a spread the
//! reader has already left is skipped rather than loaded.

use alloc::collections::VecDeque;

use crate::backend::{BodyGeometry, ContentSurface, LoadError, LoadRequest, SurfaceLoader};
use crate::flip::{Slot, SurfaceState};
use crate::section::SectionSequence;
use crate::surface::{SpreadLayout, Surface, SurfaceCollection, SurfaceId};
use crate::trace::{PrefetchEvent, PrefetchStatus, Tracer};

/// Slots filled by prefetching, in priority order. Empty readable slots come
/// first, then the pages a forward flip needs, then the backward ones.
const FILL_ORDER: [Slot; 6] = [
    Slot::ReadableLeft,
    Slot::ReadableRight,
    Slot::Next1,
    Slot::Next2,
    Slot::Prev1,
    Slot::Prev2,
];

/// A queued load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefetchJob {
    /// Section to load.
    pub section: usize,
    /// Slot the section occupied when the job was queued.
    pub slot: Slot,
}

/// Outcome of one [`PrefetchManager::pump`] step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PumpResult {
    /// Nothing is queued.
    Idle,
    /// A flip is in flight; the queue is left untouched.
    Blocked,
    /// The popped job was no longer needed.
    Skipped(PrefetchJob),
    /// A surface was loaded and inserted.
    Loaded(SurfaceId),
    /// Loading failed; the slot stays empty.
    Failed {
        /// Section that failed.
        section: usize,
        /// Why.
        error: LoadError,
    },
}

/// The section index for `slot` given the anchor, if it is non-negative.
#[must_use]
pub fn section_for(anchor: isize, slot: Slot) -> Option<usize> {
    let ordinal = isize::try_from(slot.ordinal()).ok()?;
    usize::try_from(anchor.checked_add(ordinal)?).ok()
}

/// The slot section `index` occupies given the anchor, if inside the window.
#[must_use]
pub fn slot_for(anchor: isize, index: usize) -> Option<Slot> {
    let offset = isize::try_from(index).ok()?.checked_sub(anchor)?;
    Slot::from_ordinal(i32::try_from(offset).ok()?)
}

/// FIFO of pending loads with single concurrency.
#[derive(Clone, Debug, Default)]
pub struct PrefetchManager {
    queue: VecDeque<PrefetchJob>,
}

impl PrefetchManager {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued job.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Iterates the queued jobs in order.
    pub fn jobs(&self) -> impl Iterator<Item = &PrefetchJob> {
        self.queue.iter()
    }

    /// Queues every missing page of the window around `anchor`.
    ///
    /// Sections that already have a surface, are already queued, or do not
    /// exist are not queued. Returns the number of jobs added.
    pub fn request<Q, S>(
        &mut self,
        anchor: isize,
        sections: &Q,
        surfaces: &SurfaceCollection<S>,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        Q: SectionSequence + ?Sized,
    {
        let mut added = 0;
        for slot in FILL_ORDER {
            let Some(section) = section_for(anchor, slot) else {
                continue;
            };
            if sections.get(section).is_none()
                || surfaces.find_by_section(section).is_some()
                || self.queue.iter().any(|job| job.section == section)
            {
                continue;
            }
            self.queue.push_back(PrefetchJob { section, slot });
            added += 1;
            tracer.prefetch(&PrefetchEvent {
                section,
                slot,
                status: PrefetchStatus::Queued,
                pending: self.pending(),
            });
        }
        added
    }

    /// Runs at most one queued load.
    ///
    /// Nothing happens while `flipping`. A popped job whose section already
    /// has a surface, no longer exists, or fell out of the window around
    /// `anchor` is skipped. Loaded surfaces are inserted resting in their
    /// current slot with static layout and measured geometry; showing them is
    /// left to the caller.
    pub fn pump<Q, L>(
        &mut self,
        anchor: isize,
        flipping: bool,
        sections: &Q,
        loader: &mut L,
        surfaces: &mut SurfaceCollection<L::Surface>,
        layout: &SpreadLayout,
        tracer: &mut Tracer<'_>,
    ) -> PumpResult
    where
        Q: SectionSequence + ?Sized,
        L: SurfaceLoader,
    {
        if self.queue.is_empty() {
            return PumpResult::Idle;
        }
        if flipping {
            return PumpResult::Blocked;
        }
        let Some(job) = self.queue.pop_front() else {
            return PumpResult::Idle;
        };

        let target = slot_for(anchor, job.section)
            .zip(sections.get(job.section))
            .filter(|_| surfaces.find_by_section(job.section).is_none());
        let Some((slot, section)) = target else {
            self.emit(tracer, job.section, job.slot, PrefetchStatus::Skipped);
            return PumpResult::Skipped(job);
        };

        let mut content = loader.create(&section);
        if let Err(error) = content.render(&LoadRequest {
            section,
            page: layout.page,
        }) {
            self.emit(tracer, job.section, slot, PrefetchStatus::Failed);
            return PumpResult::Failed {
                section: job.section,
                error,
            };
        }
        content.hide();
        let geometry = content.body_geometry().unwrap_or(BodyGeometry::ZERO);
        let id = surfaces.insert(Surface::new(section, SurfaceState::resting(slot), content));
        surfaces.set_layout(id, layout.slot_layout(slot));
        surfaces.set_geometry(id, geometry);

        self.emit(tracer, job.section, slot, PrefetchStatus::Loaded);
        PumpResult::Loaded(id)
    }

    fn emit(&self, tracer: &mut Tracer<'_>, section: usize, slot: Slot, status: PrefetchStatus) {
        tracer.prefetch(&PrefetchEvent {
            section,
            slot,
            status,
            pending: self.pending(),
        });
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the queue never holds more than one window of jobs"
    )]
    fn pending(&self) -> u32 {
        self.queue.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadingDirection;
    use crate::flip::Phase;
    use crate::test_support::{MockLoader, MockSurface, PAGE, VIEWPORT, book, window};
    use alloc::vec::Vec;

    fn layout() -> SpreadLayout {
        SpreadLayout::from_viewport(VIEWPORT.width, VIEWPORT.height, ReadingDirection::LeftToRight)
    }

    fn drain(
        prefetch: &mut PrefetchManager,
        anchor: isize,
        loader: &mut MockLoader,
        surfaces: &mut SurfaceCollection<MockSurface>,
    ) -> Vec<PumpResult> {
        let sections = book(20);
        let mut results = Vec::new();
        loop {
            let result = prefetch.pump(
                anchor,
                false,
                &sections,
                loader,
                surfaces,
                &layout(),
                &mut Tracer::none(),
            );
            if result == PumpResult::Idle {
                return results;
            }
            results.push(result);
        }
    }

    #[test]
    fn anchor_maps_sections_to_slots() {
        assert_eq!(section_for(-1, Slot::ReadableLeft), None);
        assert_eq!(section_for(-1, Slot::ReadableRight), Some(0));
        assert_eq!(section_for(4, Slot::Prev2), Some(2));
        assert_eq!(slot_for(4, 7), Some(Slot::Next2));
        assert_eq!(slot_for(4, 8), None);
        assert_eq!(slot_for(-1, 0), Some(Slot::ReadableRight));
    }

    #[test]
    fn fills_the_window_around_the_cover() {
        let sections = book(20);
        let mut surfaces = SurfaceCollection::new();
        let mut prefetch = PrefetchManager::new();
        let mut loader = MockLoader::default();
        surfaces.push_back(Surface::new(
            sections[0],
            SurfaceState::resting(Slot::ReadableRight),
            MockSurface::rendered(0, PAGE),
        ));

        let queued = prefetch.request(-1, &sections, &surfaces, &mut Tracer::none());
        assert_eq!(queued, 2, "only sections 1 and 2 exist ahead of the cover");
        let results = drain(&mut prefetch, -1, &mut loader, &mut surfaces);
        assert_eq!(results.len(), 2);
        assert_eq!(loader.created, [1, 2]);

        let next1 = surfaces.find(Slot::Next1, Phase::Resting).unwrap();
        assert_eq!(surfaces.section_of(next1), 1);
        let surface = surfaces.get(next1).unwrap();
        assert_eq!(surface.geometry().size(), PAGE, "loaded pages are measured");
        assert_eq!(surface.layout(), layout().slot_layout(Slot::Next1));
        assert!(!surface.content().visible, "staged pages stay hidden");
    }

    #[test]
    fn duplicate_requests_create_one_surface() {
        let sections = book(20);
        let mut surfaces = window(2, &layout());
        let next1 = surfaces.find(Slot::Next1, Phase::Resting).unwrap();
        let _ = surfaces.remove(next1);
        let mut prefetch = PrefetchManager::new();
        let mut loader = MockLoader::default();

        assert_eq!(prefetch.request(4, &sections, &surfaces, &mut Tracer::none()), 1);
        assert_eq!(prefetch.request(4, &sections, &surfaces, &mut Tracer::none()), 0);
        drain(&mut prefetch, 4, &mut loader, &mut surfaces);
        assert_eq!(prefetch.request(4, &sections, &surfaces, &mut Tracer::none()), 0);

        assert_eq!(loader.created, [6]);
        assert_eq!(surfaces.len(), 6);
    }

    #[test]
    fn blocked_while_flipping() {
        let sections = book(20);
        let mut surfaces = SurfaceCollection::new();
        let mut prefetch = PrefetchManager::new();
        let mut loader = MockLoader::default();
        prefetch.request(4, &sections, &surfaces, &mut Tracer::none());
        let before = prefetch.len();
        let result = prefetch.pump(
            4,
            true,
            &sections,
            &mut loader,
            &mut surfaces,
            &layout(),
            &mut Tracer::none(),
        );
        assert_eq!(result, PumpResult::Blocked);
        assert_eq!(prefetch.len(), before, "blocked pump keeps the queue");
        assert!(loader.created.is_empty());
    }

    #[test]
    fn stale_jobs_are_skipped() {
        let sections = book(20);
        let mut surfaces = SurfaceCollection::new();
        let mut prefetch = PrefetchManager::new();
        let mut loader = MockLoader::default();
        prefetch.request(4, &sections, &surfaces, &mut Tracer::none());
        // The reader jumped far ahead before anything loaded.
        let results = drain(&mut prefetch, 12, &mut loader, &mut surfaces);
        assert_eq!(results.len(), 6);
        assert!(
            results.iter().all(|r| matches!(r, PumpResult::Skipped(_))),
            "nothing from the old window is loaded"
        );
        assert!(surfaces.is_empty());
    }

    #[test]
    fn failed_load_leaves_slot_empty() {
        let sections = book(20);
        let mut surfaces = window(2, &layout());
        let next2 = surfaces.find(Slot::Next2, Phase::Resting).unwrap();
        let _ = surfaces.remove(next2);
        let mut prefetch = PrefetchManager::new();
        let mut loader = MockLoader {
            failing: alloc::vec![7],
            ..MockLoader::default()
        };
        prefetch.request(4, &sections, &surfaces, &mut Tracer::none());
        let results = drain(&mut prefetch, 4, &mut loader, &mut surfaces);
        assert!(matches!(
            results.as_slice(),
            [PumpResult::Failed { section: 7, .. }]
        ));
        assert!(surfaces.find_slot(Slot::Next2).is_none());
    }
}

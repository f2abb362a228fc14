// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered surface storage with allocation, lookup, and property management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::SurfaceId;
use super::layout::SlotLayout;
use crate::backend::BodyGeometry;
use crate::dirty;
use crate::flip::{Phase, Slot, SurfaceState};
use crate::section::Section;
use crate::style::StyleRecord;

/// A loaded page of content together with its place in the spread.
#[derive(Debug)]
pub struct Surface<S> {
    section: Section,
    state: SurfaceState,
    geometry: BodyGeometry,
    layout: SlotLayout,
    style: Option<StyleRecord>,
    visible: bool,
    content: S,
}

impl<S> Surface<S> {
    /// Wraps loaded content. The surface starts hidden, unmeasured and
    /// without layout.
    #[must_use]
    pub fn new(section: Section, state: SurfaceState, content: S) -> Self {
        Self {
            section,
            state,
            geometry: BodyGeometry::ZERO,
            layout: SlotLayout::default(),
            style: None,
            visible: false,
            content,
        }
    }

    /// The section shown by this surface.
    #[inline]
    #[must_use]
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Current slot and phase.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Last measured body geometry (zero until measured).
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> BodyGeometry {
        self.geometry
    }

    /// Static layout for the surface's slot.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    /// Per-frame style while the surface takes part in a flip.
    #[inline]
    #[must_use]
    pub fn style(&self) -> Option<&StyleRecord> {
        self.style.as_ref()
    }

    /// The style to paint: the flip style if present, else the static
    /// layout.
    #[must_use]
    pub fn effective_style(&self) -> StyleRecord {
        self.style.unwrap_or_else(|| self.layout.to_style())
    }

    /// Whether the surface is currently shown.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The loaded content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &S {
        &self.content
    }

    /// Consumes the surface, returning its content.
    #[must_use]
    pub fn into_content(self) -> S {
        self.content
    }
}

/// Surfaces in document order.
///
/// Surfaces are addressed by [`SurfaceId`] handles. Internally each surface
/// occupies a storage slot; retired slots are recycled through a free list and
/// generation counters reject stale handles. A separate order list keeps the
/// surfaces sorted by section index.
///
/// Every mutator marks the matching [`dirty`] channel, so
/// [`evaluate`](Self::evaluate) can report exactly what changed.
#[derive(Debug)]
pub struct SurfaceCollection<S> {
    pub(crate) slots: Vec<Option<Surface<S>>>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) order: Vec<u32>,
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) order_changed: bool,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl<S> Default for SurfaceCollection<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SurfaceCollection<S> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            order_changed: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    /// Number of surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // -- Insertion and removal --

    /// Appends a surface after all others.
    ///
    /// # Panics
    ///
    /// Panics if the section does not come after the last surface's section.
    pub fn push_back(&mut self, surface: Surface<S>) -> SurfaceId {
        if let Some(&last) = self.order.last() {
            assert!(
                self.section_at(last) < surface.section.index,
                "push_back would break document order"
            );
        }
        let pos = self.order.len();
        self.allocate(surface, pos)
    }

    /// Prepends a surface before all others.
    ///
    /// # Panics
    ///
    /// Panics if the section does not come before the first surface's section.
    pub fn push_front(&mut self, surface: Surface<S>) -> SurfaceId {
        if let Some(&first) = self.order.first() {
            assert!(
                self.section_at(first) > surface.section.index,
                "push_front would break document order"
            );
        }
        self.allocate(surface, 0)
    }

    /// Inserts a surface at its document-order position.
    ///
    /// # Panics
    ///
    /// Panics if a surface for the same section already exists.
    pub fn insert(&mut self, surface: Surface<S>) -> SurfaceId {
        let index = surface.section.index;
        let pos = self
            .order
            .partition_point(|&i| self.section_at(i) < index);
        if let Some(&at) = self.order.get(pos) {
            assert!(
                self.section_at(at) != index,
                "section {index} already has a surface"
            );
        }
        self.allocate(surface, pos)
    }

    /// Removes a surface and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove(&mut self, id: SurfaceId) -> Surface<S> {
        self.validate(id);
        let idx = id.idx;
        let Some(surface) = self.slots[idx as usize].take() else {
            unreachable!("validated slot is occupied");
        };
        self.order.retain(|&i| i != idx);
        self.dirty.remove_key(idx);
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        self.order_changed = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        surface
    }

    /// Removes every surface, returning them in document order.
    pub fn clear(&mut self) -> Vec<Surface<S>> {
        let ids = self.ids();
        ids.into_iter().map(|id| self.remove(id)).collect()
    }

    // -- Lookup --

    /// Whether `id` refers to a live surface.
    #[must_use]
    pub fn contains(&self, id: SurfaceId) -> bool {
        (id.idx as usize) < self.slots.len()
            && self.generation[id.idx as usize] == id.generation
            && self.slots[id.idx as usize].is_some()
    }

    /// Returns the surface for `id`, or `None` if the handle is stale.
    #[must_use]
    pub fn get(&self, id: SurfaceId) -> Option<&Surface<S>> {
        if self.contains(id) {
            self.slots[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns the surface stored at a raw slot index, as reported by
    /// [`SpreadChanges`](super::SpreadChanges).
    #[must_use]
    pub fn at(&self, idx: u32) -> Option<&Surface<S>> {
        self.slots.get(idx as usize).and_then(Option::as_ref)
    }

    /// Returns the live handle for a raw slot index.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<SurfaceId> {
        self.at(idx).map(|_| SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Mutable access to a surface's content, for calls into the content
    /// itself (`resize`, `scroll_to`, `show`/`hide`).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn content_mut(&mut self, id: SurfaceId) -> &mut S {
        &mut self.surface_mut(id).content
    }

    /// Slot and phase of a surface.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn state(&self, id: SurfaceId) -> SurfaceState {
        self.surface(id).state
    }

    /// Section index of a surface.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn section_of(&self, id: SurfaceId) -> usize {
        self.surface(id).section.index
    }

    /// Handles of all surfaces in document order.
    #[must_use]
    pub fn ids(&self) -> Vec<SurfaceId> {
        self.order
            .iter()
            .map(|&idx| SurfaceId {
                idx,
                generation: self.generation[idx as usize],
            })
            .collect()
    }

    /// Iterates surfaces in document order.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &Surface<S>)> + '_ {
        self.order.iter().filter_map(|&idx| {
            let surface = self.slots[idx as usize].as_ref()?;
            let id = SurfaceId {
                idx,
                generation: self.generation[idx as usize],
            };
            Some((id, surface))
        })
    }

    /// Raw slot indices in document order.
    #[must_use]
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// First surface (in document order) matching `pred`.
    pub fn find_by(&self, mut pred: impl FnMut(&Surface<S>) -> bool) -> Option<SurfaceId> {
        self.iter().find(|(_, s)| pred(s)).map(|(id, _)| id)
    }

    /// The surface in `slot` with `phase`.
    #[must_use]
    pub fn find(&self, slot: Slot, phase: Phase) -> Option<SurfaceId> {
        self.find_by(|s| s.state.slot == slot && s.state.phase == phase)
    }

    /// The surface in `slot`, whatever its phase.
    #[must_use]
    pub fn find_slot(&self, slot: Slot) -> Option<SurfaceId> {
        self.find_by(|s| s.state.slot == slot)
    }

    /// The surface showing section `index`.
    #[must_use]
    pub fn find_by_section(&self, index: usize) -> Option<SurfaceId> {
        self.find_by(|s| s.section.index == index)
    }

    // -- Mutation (marks dirty) --

    /// Sets the slot and phase of a surface.
    pub fn set_state(&mut self, id: SurfaceId, state: SurfaceState) {
        let surface = self.surface_mut(id);
        if surface.state != state {
            surface.state = state;
            self.dirty.mark(id.idx, dirty::STYLE);
        }
    }

    /// Sets or clears the per-frame flip style.
    pub fn set_style(&mut self, id: SurfaceId, style: Option<StyleRecord>) {
        let surface = self.surface_mut(id);
        if surface.style != style {
            surface.style = style;
            self.dirty.mark(id.idx, dirty::STYLE);
        }
    }

    /// Sets the static slot layout.
    pub fn set_layout(&mut self, id: SurfaceId, layout: SlotLayout) {
        let surface = self.surface_mut(id);
        if surface.layout != layout {
            surface.layout = layout;
            self.dirty.mark(id.idx, dirty::LAYOUT);
        }
    }

    /// Shows or hides a surface.
    pub fn set_visible(&mut self, id: SurfaceId, visible: bool) {
        let surface = self.surface_mut(id);
        if surface.visible != visible {
            surface.visible = visible;
            self.dirty.mark(id.idx, dirty::VISIBILITY);
        }
    }

    /// Records a new body measurement.
    pub fn set_geometry(&mut self, id: SurfaceId, geometry: BodyGeometry) {
        self.surface_mut(id).geometry = geometry;
    }

    // -- Internal helpers --

    fn allocate(&mut self, surface: Surface<S>, pos: usize) -> SurfaceId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(surface);
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a spread window holds a handful of surfaces"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Some(surface));
            self.generation.push(0);
            idx
        };
        self.order.insert(pos, idx);
        self.order_changed = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        SurfaceId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    fn section_at(&self, idx: u32) -> usize {
        self.slots[idx as usize]
            .as_ref()
            .map_or(usize::MAX, |s| s.section.index)
    }

    fn surface(&self, id: SurfaceId) -> &Surface<S> {
        self.validate(id);
        match &self.slots[id.idx as usize] {
            Some(surface) => surface,
            None => unreachable!("validated slot is occupied"),
        }
    }

    fn surface_mut(&mut self, id: SurfaceId) -> &mut Surface<S> {
        self.validate(id);
        match &mut self.slots[id.idx as usize] {
            Some(surface) => surface,
            None => unreachable!("validated slot is occupied"),
        }
    }

    fn validate(&self, id: SurfaceId) {
        assert!(self.contains(id), "stale surface handle: {id:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(index: usize, slot: Slot) -> Surface<()> {
        Surface::new(Section::new(index), SurfaceState::resting(slot), ())
    }

    fn sections(c: &SurfaceCollection<()>) -> Vec<usize> {
        c.iter().map(|(_, s)| s.section().index).collect()
    }

    #[test]
    fn keeps_document_order() {
        let mut c = SurfaceCollection::new();
        c.push_back(surface(4, Slot::ReadableLeft));
        c.push_back(surface(5, Slot::ReadableRight));
        c.push_front(surface(3, Slot::Prev1));
        c.insert(surface(7, Slot::Next2));
        c.insert(surface(6, Slot::Next1));
        assert_eq!(sections(&c), [3, 4, 5, 6, 7]);
        assert_eq!(c.len(), 5);
    }

    #[test]
    #[should_panic(expected = "document order")]
    fn push_back_rejects_earlier_section() {
        let mut c = SurfaceCollection::new();
        c.push_back(surface(4, Slot::ReadableLeft));
        c.push_back(surface(2, Slot::Prev2));
    }

    #[test]
    #[should_panic(expected = "already has a surface")]
    fn insert_rejects_duplicate_section() {
        let mut c = SurfaceCollection::new();
        c.insert(surface(4, Slot::ReadableLeft));
        c.insert(surface(4, Slot::ReadableLeft));
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut c = SurfaceCollection::new();
        let a = c.push_back(surface(1, Slot::ReadableLeft));
        let removed = c.remove(a);
        assert_eq!(removed.section().index, 1);
        assert!(!c.contains(a));
        assert!(c.get(a).is_none());

        let b = c.push_back(surface(2, Slot::ReadableRight));
        assert_eq!(b.index(), a.index(), "slot is recycled");
        assert_ne!(b.generation(), a.generation());
    }

    #[test]
    #[should_panic(expected = "stale surface handle")]
    fn stale_handle_panics_on_state() {
        let mut c = SurfaceCollection::new();
        let a = c.push_back(surface(1, Slot::ReadableLeft));
        let _ = c.remove(a);
        let _ = c.state(a);
    }

    #[test]
    fn find_by_slot_and_phase() {
        use crate::flip::FlipDirection;

        let mut c = SurfaceCollection::new();
        let left = c.push_back(surface(2, Slot::ReadableLeft));
        let right = c.push_back(surface(3, Slot::ReadableRight));
        assert_eq!(c.find(Slot::ReadableRight, Phase::Resting), Some(right));
        c.set_state(
            right,
            SurfaceState::transitioning(Slot::ReadableRight, FlipDirection::Forward),
        );
        assert_eq!(c.find(Slot::ReadableRight, Phase::Resting), None);
        assert_eq!(c.find_slot(Slot::ReadableRight), Some(right));
        assert_eq!(c.find_by_section(2), Some(left));
        assert_eq!(c.find_by_section(9), None);
    }

    #[test]
    fn clear_returns_everything_in_order() {
        let mut c = SurfaceCollection::new();
        c.push_back(surface(2, Slot::ReadableLeft));
        c.push_back(surface(3, Slot::ReadableRight));
        let gone: Vec<usize> = c.clear().iter().map(|s| s.section().index).collect();
        assert_eq!(gone, [2, 3]);
        assert!(c.is_empty());
    }

    #[test]
    fn effective_style_prefers_flip_style() {
        let mut c = SurfaceCollection::new();
        let id = c.push_back(surface(2, Slot::ReadableLeft));
        let layout = SlotLayout {
            origin: kurbo::Vec2::new(10.0, 0.0),
            size: kurbo::Size::new(100.0, 200.0),
        };
        c.set_layout(id, layout);
        assert_eq!(c.get(id).unwrap().effective_style(), layout.to_style());

        let mut style = layout.to_style();
        style.opacity = 0.5;
        c.set_style(id, Some(style));
        assert_eq!(c.get(id).unwrap().effective_style().opacity, 0.5);
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for presenters.
//!
//! [`SpreadChanges`] uses raw slot indices (`u32`) rather than
//! [`SurfaceId`](super::SurfaceId) handles so that presenters can key their
//! native nodes by index and read surfaces back through
//! [`SurfaceCollection::at`]. Removed indices may be reused by surfaces added
//! in the same batch, so presenters handle `removed` before `added`.

use alloc::vec::Vec;

use super::collection::SurfaceCollection;
use crate::dirty;

/// The set of changes produced by a single [`SurfaceCollection::evaluate`]
/// call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpreadChanges {
    /// Surfaces whose flip style or slot state changed.
    pub styles: Vec<u32>,
    /// Surfaces whose static layout changed.
    pub layouts: Vec<u32>,
    /// Surfaces that became visible.
    pub shown: Vec<u32>,
    /// Surfaces that became hidden.
    pub hidden: Vec<u32>,
    /// Surfaces added since the last evaluate.
    pub added: Vec<u32>,
    /// Surfaces removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether document order changed.
    pub order_changed: bool,
}

impl SpreadChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.styles.clear();
        self.layouts.clear();
        self.shown.clear();
        self.hidden.clear();
        self.added.clear();
        self.removed.clear();
        self.order_changed = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
            && self.layouts.is_empty()
            && self.shown.is_empty()
            && self.hidden.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.order_changed
    }
}

impl<S> SurfaceCollection<S> {
    /// Drains all dirty channels and returns what changed.
    pub fn evaluate(&mut self) -> SpreadChanges {
        let mut changes = SpreadChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SpreadChanges) {
        changes.clear();

        changes.order_changed = core::mem::take(&mut self.order_changed);

        let live = |this: &Self, idx: &u32| this.at(*idx).is_some();

        let styles: Vec<u32> = self
            .dirty
            .drain(dirty::STYLE)
            .deterministic()
            .run()
            .collect();
        changes.styles = styles.into_iter().filter(|i| live(self, i)).collect();

        let layouts: Vec<u32> = self
            .dirty
            .drain(dirty::LAYOUT)
            .deterministic()
            .run()
            .collect();
        changes.layouts = layouts.into_iter().filter(|i| live(self, i)).collect();

        let visibility: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .deterministic()
            .run()
            .collect();
        for idx in visibility {
            match self.at(idx) {
                Some(s) if s.is_visible() => changes.shown.push(idx),
                Some(_) => changes.hidden.push(idx),
                None => {}
            }
        }

        // Structural changes are reported through the lifecycle lists.
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        changes.added.retain(|&idx| self.slots[idx as usize].is_some());
    }
}

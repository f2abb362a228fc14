// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface identity.

use core::fmt;

/// A handle to a surface in a [`SurfaceCollection`](super::SurfaceCollection).
///
/// Contains both a slot index and a generation counter so that handles to
/// retired surfaces are detected after the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SurfaceId {
    /// Returns the raw slot index, as used in
    /// [`SpreadChanges`](super::SpreadChanges).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({}@gen{})", self.idx, self.generation)
    }
}

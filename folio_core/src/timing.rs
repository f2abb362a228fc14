// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticks delivered by the host.
//!
//! The page-turn subsystem is frame-driven: the host forwards every display
//! callback (`requestAnimationFrame`, a display link, a test loop) as a
//! [`FrameTick`] to [`SpreadManager::tick`](crate::spread::SpreadManager::tick).
//! Timed flips sample their progression from [`FrameTick::now`], so all
//! geometry produced for one transition is monotonic in frame time.

use crate::time::{Duration, HostTime};

/// A frame opportunity delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Display refresh interval, if known.
    pub refresh_interval: Option<Duration>,
}

impl FrameTick {
    /// Creates a tick with no refresh interval information.
    #[inline]
    #[must_use]
    pub const fn new(now: HostTime, frame_index: u64) -> Self {
        Self {
            now,
            frame_index,
            refresh_interval: None,
        }
    }

    /// Returns the tick expected one refresh interval later, if the interval
    /// is known.
    ///
    /// Hosts that pace a simulated loop (tests, the demo) use this to step
    /// time forward.
    #[must_use]
    pub fn following(&self) -> Option<Self> {
        let interval = self.refresh_interval?;
        Some(Self {
            now: self.now + interval,
            frame_index: self.frame_index + 1,
            refresh_interval: Some(interval),
        })
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewer configuration.

use crate::easing::Easing;
use crate::geometry::FoldShape;
use crate::time::{Duration, Timebase};

/// Reading order of the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReadingDirection {
    /// Pages advance from right to left (the right-hand page turns).
    #[default]
    LeftToRight,
    /// Pages advance from left to right (the left-hand page turns).
    RightToLeft,
}

/// How section content is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Content reflows to the page; seeking inside a loaded section is
    /// possible.
    #[default]
    Reflowable,
    /// Fixed-layout pages; spread markers on sections are honored.
    PrePaginated,
}

/// Tuning for page turns and spread layout.
///
/// Durations are in host ticks, so a configuration belongs to one
/// [`Timebase`]. Use the preset matching the backend's clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipConfig {
    /// Duration of a complete timed flip. Partial flips (gesture release)
    /// scale this by the remaining distance.
    pub duration: Duration,
    /// Fold angle profile of the turning page.
    pub fold: FoldShape,
    /// Distance in pixels that the fold runs ahead of the pointer while
    /// dragging.
    pub finger_offset: f64,
    /// Reading order.
    pub reading: ReadingDirection,
    /// Content layout mode.
    pub layout: LayoutMode,
    /// Timing function applied to timed flips.
    pub easing: Easing,
}

impl FlipConfig {
    /// Base flip duration in milliseconds.
    pub const DURATION_MS: u64 = 400;

    /// Default finger offset in pixels.
    pub const FINGER_OFFSET: f64 = 24.0;

    /// Preset for nanosecond host clocks.
    #[must_use]
    pub const fn nanos() -> Self {
        Self::for_timebase(Timebase::NANOS)
    }

    /// Preset for the web backend (microsecond ticks from
    /// `performance.now()`).
    #[must_use]
    pub const fn web() -> Self {
        Self::for_timebase(Timebase::MICROS)
    }

    const fn for_timebase(timebase: Timebase) -> Self {
        Self {
            duration: Duration::from_millis(Self::DURATION_MS, timebase),
            fold: FoldShape::DEFAULT,
            finger_offset: Self::FINGER_OFFSET,
            reading: ReadingDirection::LeftToRight,
            layout: LayoutMode::Reflowable,
            easing: Easing::EASE_IN,
        }
    }

    /// Returns a copy with the given reading direction.
    #[must_use]
    pub const fn with_reading(mut self, reading: ReadingDirection) -> Self {
        self.reading = reading;
        self
    }

    /// Returns a copy with the given layout mode.
    #[must_use]
    pub const fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self::nanos()
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static placement of surfaces in the spread.

use kurbo::{Size, Vec2};

use crate::config::ReadingDirection;
use crate::flip::{Side, Slot};
use crate::style::StyleRecord;

/// Where a resting surface sits and how big it is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SlotLayout {
    /// Top-left corner in spread coordinates. Right-hand pages are offset by
    /// one page width.
    pub origin: Vec2,
    /// Page size.
    pub size: Size,
}

impl SlotLayout {
    /// The style of an unfolded page in this layout.
    #[must_use]
    pub fn to_style(self) -> StyleRecord {
        StyleRecord::resting(self.origin, self.size)
    }
}

/// Page geometry of the whole spread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpreadLayout {
    /// Size of one page (half the spread).
    pub page: Size,
    /// Reading order, which decides the visual side of each slot.
    pub reading: ReadingDirection,
}

impl SpreadLayout {
    /// Splits a viewport of `width × height` into two pages.
    #[must_use]
    pub fn from_viewport(width: f64, height: f64, reading: ReadingDirection) -> Self {
        Self {
            page: Size::new((width * 0.5).max(0.0), height.max(0.0)),
            reading,
        }
    }

    /// Size of the full two-page spread.
    #[must_use]
    pub fn spread_size(&self) -> Size {
        Size::new(self.page.width * 2.0, self.page.height)
    }

    /// Top-left corner of a page in `slot`.
    ///
    /// Staged pages are placed where they will appear once flipped in.
    #[must_use]
    pub fn origin(&self, slot: Slot) -> Vec2 {
        match slot.side().visual(self.reading) {
            Side::Left => Vec2::ZERO,
            Side::Right => Vec2::new(self.page.width, 0.0),
        }
    }

    /// Static layout of a surface in `slot`.
    #[must_use]
    pub fn slot_layout(&self, slot: Slot) -> SlotLayout {
        SlotLayout {
            origin: self.origin(slot),
            size: self.page,
        }
    }
}

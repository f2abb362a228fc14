// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture input.
//!
//! Gesture capture belongs to the host; it forwards what it sees as
//! [`GestureEvent`]s to [`SpreadManager::handle_gesture`](crate::spread::SpreadManager::handle_gesture).

use crate::geometry::{Turn, clamp_progression};
use crate::trace::GestureKind;

/// A gesture input from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A drag began at pointer `x`, heading in `turn`'s direction.
    DragStart {
        /// Direction the page is being pulled.
        turn: Turn,
        /// Pointer x in spread coordinates.
        x: f64,
    },
    /// The pointer moved during a drag.
    DragMove {
        /// Pointer x in spread coordinates.
        x: f64,
    },
    /// The pointer was released.
    DragEnd,
    /// A discrete swipe was recognized.
    Swipe(Turn),
}

impl GestureEvent {
    /// The kind of input, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> GestureKind {
        match self {
            Self::DragStart { .. } => GestureKind::DragStart,
            Self::DragMove { .. } => GestureKind::DragMove,
            Self::DragEnd => GestureKind::DragEnd,
            Self::Swipe(_) => GestureKind::Swipe,
        }
    }

    /// Pointer x, for drag start and move.
    #[must_use]
    pub const fn x(&self) -> Option<f64> {
        match self {
            Self::DragStart { x, .. } | Self::DragMove { x } => Some(*x),
            Self::DragEnd | Self::Swipe(_) => None,
        }
    }
}

/// Flip progression for a drag from `start_x` to `x`.
///
/// The finger travels across both pages for a full turn, so displacement is
/// measured against twice the page width. The fold runs `finger_offset`
/// ahead of the pointer. Dragging against `turn` yields 0.
#[must_use]
pub fn drag_progression(start_x: f64, x: f64, turn: Turn, page_width: f64, finger_offset: f64) -> f64 {
    let displacement = (start_x - x) * turn.sign();
    if displacement > 0.0 && page_width > 0.0 {
        clamp_progression((displacement + finger_offset) / (2.0 * page_width))
    } else {
        0.0
    }
}

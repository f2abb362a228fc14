// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot and phase state of surfaces, and the flip transition table.
//!
//! Every surface sits in one of six [`Slot`]s relative to the current spread,
//! numbered in reading order:
//!
//! ```text
//!   Prev2  Prev1 │ ReadableLeft  ReadableRight │ Next1  Next2
//!    -2     -1   │      0              1       │   2      3
//! ```
//!
//! "Left" and "right" are logical (reading-order) sides; with
//! [`RightToLeft`](ReadingDirection::RightToLeft) reading they swap visual
//! sides.
//!
//! A forward flip turns `ReadableRight` over, revealing `Next1` on its back
//! and uncovering `Next2` beneath it. Committing shifts every ordinal by −2;
//! surfaces whose ordinal leaves `[-2, 3]` are retired. A backward flip is the
//! mirror image (`ReadableLeft` turns, `Prev1` revealed, `Prev2` uncovered,
//! ordinals shift by +2). Reverting puts every participant back to rest
//! in its original slot.

use alloc::vec::Vec;
use core::fmt;

use crate::config::ReadingDirection;
use crate::geometry::Turn;
use crate::surface::{SurfaceCollection, SurfaceId};

/// Direction of a flip through the book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    /// Towards later sections ("next").
    Forward,
    /// Towards earlier sections ("prev").
    Backward,
}

impl FlipDirection {
    /// Returns the other direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Ordinal shift applied to every surface on commit.
    #[must_use]
    pub const fn shift(self) -> i32 {
        match self {
            Self::Forward => -2,
            Self::Backward => 2,
        }
    }

    /// Slot of the page that turns over.
    #[must_use]
    pub const fn turning_slot(self) -> Slot {
        match self {
            Self::Forward => Slot::ReadableRight,
            Self::Backward => Slot::ReadableLeft,
        }
    }

    /// Slot of the page on the back of the turning leaf.
    #[must_use]
    pub const fn revealed_slot(self) -> Slot {
        match self {
            Self::Forward => Slot::Next1,
            Self::Backward => Slot::Prev1,
        }
    }

    /// Slot of the page uncovered beneath the turning leaf.
    #[must_use]
    pub const fn underneath_slot(self) -> Slot {
        match self {
            Self::Forward => Slot::Next2,
            Self::Backward => Slot::Prev2,
        }
    }

    /// Which way the page travels on screen.
    #[must_use]
    pub const fn turn(self, reading: ReadingDirection) -> Turn {
        match (self, reading) {
            (Self::Forward, ReadingDirection::LeftToRight)
            | (Self::Backward, ReadingDirection::RightToLeft) => Turn::TowardLeft,
            (Self::Backward, ReadingDirection::LeftToRight)
            | (Self::Forward, ReadingDirection::RightToLeft) => Turn::TowardRight,
        }
    }

    /// The flip direction a turn gesture means in the given reading order.
    #[must_use]
    pub const fn from_turn(turn: Turn, reading: ReadingDirection) -> Self {
        match (turn, reading) {
            (Turn::TowardLeft, ReadingDirection::LeftToRight)
            | (Turn::TowardRight, ReadingDirection::RightToLeft) => Self::Forward,
            (Turn::TowardRight, ReadingDirection::LeftToRight)
            | (Turn::TowardLeft, ReadingDirection::RightToLeft) => Self::Backward,
        }
    }
}

/// A side of the spread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left half.
    Left,
    /// Right half.
    Right,
}

impl Side {
    /// Maps a logical (reading-order) side to the side it appears on screen.
    #[must_use]
    pub const fn visual(self, reading: ReadingDirection) -> Self {
        match (self, reading) {
            (side, ReadingDirection::LeftToRight) => side,
            (Self::Left, ReadingDirection::RightToLeft) => Self::Right,
            (Self::Right, ReadingDirection::RightToLeft) => Self::Left,
        }
    }
}

/// Position of a surface relative to the current spread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// Two pages behind the left readable page.
    Prev2,
    /// The page behind the left readable page.
    Prev1,
    /// Left readable page (in reading order).
    ReadableLeft,
    /// Right readable page (in reading order).
    ReadableRight,
    /// The page after the right readable page.
    Next1,
    /// Two pages after the right readable page.
    Next2,
}

impl Slot {
    /// All slots in reading order.
    pub const ALL: [Self; 6] = [
        Self::Prev2,
        Self::Prev1,
        Self::ReadableLeft,
        Self::ReadableRight,
        Self::Next1,
        Self::Next2,
    ];

    /// Offset from the left readable slot.
    #[must_use]
    pub const fn ordinal(self) -> i32 {
        match self {
            Self::Prev2 => -2,
            Self::Prev1 => -1,
            Self::ReadableLeft => 0,
            Self::ReadableRight => 1,
            Self::Next1 => 2,
            Self::Next2 => 3,
        }
    }

    /// Inverse of [`ordinal`](Self::ordinal); `None` outside the window.
    #[must_use]
    pub const fn from_ordinal(ordinal: i32) -> Option<Self> {
        Some(match ordinal {
            -2 => Self::Prev2,
            -1 => Self::Prev1,
            0 => Self::ReadableLeft,
            1 => Self::ReadableRight,
            2 => Self::Next1,
            3 => Self::Next2,
            _ => return None,
        })
    }

    /// Whether this is one of the two spread slots.
    #[must_use]
    pub const fn is_readable(self) -> bool {
        matches!(self, Self::ReadableLeft | Self::ReadableRight)
    }

    /// Whether this slot lies after the spread.
    #[must_use]
    pub const fn is_ahead(self) -> bool {
        matches!(self, Self::Next1 | Self::Next2)
    }

    /// Logical side the page's content occupies, both while readable and
    /// while staged to be flipped in.
    #[must_use]
    pub const fn side(self) -> Side {
        if self.ordinal().rem_euclid(2) == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Whether a surface is at rest or mid-flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// At rest in its slot.
    Resting,
    /// Taking part in a flip in the given direction.
    Transitioning(FlipDirection),
}

/// Slot and phase of one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceState {
    /// Position relative to the spread.
    pub slot: Slot,
    /// Rest or mid-flip.
    pub phase: Phase,
}

impl SurfaceState {
    /// A surface at rest in `slot`.
    #[must_use]
    pub const fn resting(slot: Slot) -> Self {
        Self {
            slot,
            phase: Phase::Resting,
        }
    }

    /// A surface in `slot` taking part in a flip.
    #[must_use]
    pub const fn transitioning(slot: Slot, direction: FlipDirection) -> Self {
        Self {
            slot,
            phase: Phase::Transitioning(direction),
        }
    }

    /// Whether the surface is at rest.
    #[must_use]
    pub const fn is_resting(self) -> bool {
        matches!(self.phase, Phase::Resting)
    }

    /// Whether the surface is a readable page at rest.
    #[must_use]
    pub const fn is_readable_resting(self) -> bool {
        self.slot.is_readable() && self.is_resting()
    }

    /// Whether the surface should be painted: readable pages at rest and
    /// every flip participant. Staged pages stay hidden.
    #[must_use]
    pub const fn is_rendered(self) -> bool {
        self.is_readable_resting() || !self.is_resting()
    }

    /// The resting state after a flip in `direction` commits, or `None` when
    /// the surface falls out of the window and must be retired.
    #[must_use]
    pub const fn committed(self, direction: FlipDirection) -> Option<Self> {
        match Slot::from_ordinal(self.slot.ordinal() + direction.shift()) {
            Some(slot) => Some(Self::resting(slot)),
            None => None,
        }
    }

    /// Presentation class name for this state.
    ///
    /// Names describe what is on screen, so they depend on the reading
    /// direction: staged pages are named after the side they will be flipped
    /// in from and the side their content sits on.
    #[must_use]
    pub const fn class_name(self, reading: ReadingDirection) -> &'static str {
        let on = self.slot.side().visual(reading);
        let moving = !self.is_resting();
        if self.slot.is_readable() {
            return match (on, moving) {
                (Side::Left, false) => "readablePageLeft",
                (Side::Right, false) => "readablePageRight",
                (Side::Left, true) => "leftPageFlippingToRight",
                (Side::Right, true) => "rightPageFlippingToLeft",
            };
        }
        let from = if self.slot.is_ahead() {
            Slot::ReadableRight.side().visual(reading)
        } else {
            Slot::ReadableLeft.side().visual(reading)
        };
        match (from, on, moving) {
            (Side::Left, Side::Left, false) => "flippableFromLeftOnLeftSide",
            (Side::Left, Side::Left, true) => "flippableFromLeftOnLeftSideFlippingRight",
            (Side::Left, Side::Right, false) => "flippableFromLeftOnRightSide",
            (Side::Left, Side::Right, true) => "flippableFromLeftOnRightSideFlippingRight",
            (Side::Right, Side::Left, false) => "flippableFromRightOnLeftSide",
            (Side::Right, Side::Left, true) => "flippableFromRightOnLeftSideFlippingLeft",
            (Side::Right, Side::Right, false) => "flippableFromRightOnRightSide",
            (Side::Right, Side::Right, true) => "flippableFromRightOnRightSideFlippingLeft",
        }
    }
}

/// What a surface does during a flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The page being turned over.
    Turning,
    /// The page on the back of the turning leaf.
    Revealed,
    /// The page uncovered beneath the leaf.
    Underneath,
}

impl Role {
    /// The role a surface in `slot` plays in a flip in `direction`, if any.
    #[must_use]
    pub const fn of(slot: Slot, direction: FlipDirection) -> Option<Self> {
        match direction {
            FlipDirection::Forward => match slot {
                Slot::ReadableRight => Some(Self::Turning),
                Slot::Next1 => Some(Self::Revealed),
                Slot::Next2 => Some(Self::Underneath),
                _ => None,
            },
            FlipDirection::Backward => match slot {
                Slot::ReadableLeft => Some(Self::Turning),
                Slot::Prev1 => Some(Self::Revealed),
                Slot::Prev2 => Some(Self::Underneath),
                _ => None,
            },
        }
    }
}

/// The surfaces taking part in one flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Participants {
    /// The page being turned.
    pub turning: SurfaceId,
    /// The page on the back of the leaf.
    pub revealed: SurfaceId,
    /// The page beneath the leaf, when loaded.
    pub underneath: Option<SurfaceId>,
}

impl Participants {
    /// Whether `id` takes part.
    #[must_use]
    pub fn contains(&self, id: SurfaceId) -> bool {
        self.turning == id || self.revealed == id || self.underneath == Some(id)
    }

    /// Iterates `(role, surface)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Role, SurfaceId)> {
        [
            Some((Role::Turning, self.turning)),
            Some((Role::Revealed, self.revealed)),
            self.underneath.map(|id| (Role::Underneath, id)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Why a flip did not start.
///
/// Refusals are not errors: the caller retries once loading has caught up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipRefusal {
    /// Another flip is in flight.
    Busy,
    /// There is no readable page to turn.
    MissingTurning,
    /// The page to reveal is not loaded yet.
    MissingNeighbor,
}

impl FlipRefusal {
    /// Short lowercase label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::MissingTurning => "missing-turning",
            Self::MissingNeighbor => "missing-neighbor",
        }
    }
}

impl fmt::Display for FlipRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up the participants of a flip in `direction` without changing
/// anything.
///
/// # Errors
///
/// Returns a [`FlipRefusal`] when a flip is already in progress or a required
/// surface is missing.
pub fn participants<S>(
    surfaces: &SurfaceCollection<S>,
    direction: FlipDirection,
) -> Result<Participants, FlipRefusal> {
    if surfaces.find_by(|s| !s.state().is_resting()).is_some() {
        return Err(FlipRefusal::Busy);
    }
    let turning = surfaces
        .find(direction.turning_slot(), Phase::Resting)
        .ok_or(FlipRefusal::MissingTurning)?;
    let revealed = surfaces
        .find(direction.revealed_slot(), Phase::Resting)
        .ok_or(FlipRefusal::MissingNeighbor)?;
    let underneath = surfaces.find(direction.underneath_slot(), Phase::Resting);
    Ok(Participants {
        turning,
        revealed,
        underneath,
    })
}

/// Moves the participants of a flip in `direction` into the transitioning
/// phase.
///
/// # Errors
///
/// Same as [`participants`]; nothing is mutated on refusal.
pub fn begin<S>(
    surfaces: &mut SurfaceCollection<S>,
    direction: FlipDirection,
) -> Result<Participants, FlipRefusal> {
    let found = participants(surfaces, direction)?;
    for (_, id) in found.iter() {
        let slot = surfaces.state(id).slot;
        surfaces.set_state(id, SurfaceState::transitioning(slot, direction));
    }
    Ok(found)
}

/// Completes a flip: every surface moves two slots along and comes to rest.
///
/// Returns the surfaces that left the window. They keep their old state and
/// are still in the collection; the caller removes them.
pub fn commit<S>(surfaces: &mut SurfaceCollection<S>, direction: FlipDirection) -> Vec<SurfaceId> {
    let mut retired = Vec::new();
    for id in surfaces.ids() {
        match surfaces.state(id).committed(direction) {
            Some(next) => surfaces.set_state(id, next),
            None => retired.push(id),
        }
    }
    retired
}

/// Abandons a flip: participants come back to rest where they started.
pub fn revert<S>(surfaces: &mut SurfaceCollection<S>, participants: &Participants) {
    for (_, id) in participants.iter() {
        if surfaces.contains(id) {
            let slot = surfaces.state(id).slot;
            surfaces.set_state(id, SurfaceState::resting(slot));
        }
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for flips, gestures, and loading.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! spread, driver, and prefetch queue call as things happen. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Refused flips are not errors; they are reported here through
//! [`TraceSink::on_flip_refused`] and nowhere else.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`SurfaceStyleChange`] events and
//!   the corresponding `TraceSink` method.

use crate::driver::{FlipMode, SettleOutcome};
use crate::flip::{FlipDirection, FlipRefusal, Slot};
#[cfg(feature = "trace-rich")]
use crate::flip::Role;
use crate::geometry::Turn;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which gesture input arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// A drag began.
    DragStart,
    /// The pointer moved during a drag.
    DragMove,
    /// The drag ended.
    DragEnd,
    /// A discrete swipe.
    Swipe,
}

/// Outcome of one prefetch step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefetchStatus {
    /// A load job was queued.
    Queued,
    /// A staged surface was loaded and measured.
    Loaded,
    /// A queued job was dropped because its slot was filled or left the
    /// window.
    Skipped,
    /// Loading failed; the slot stays empty.
    Failed,
}

/// How a display request was served.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    /// The section was already readable; the view seeked inside it.
    Seeked,
    /// The spread was rebuilt around the section.
    Built,
    /// Loading failed and the spread was cleared.
    Failed,
    /// Rejected while a flip was in flight.
    Refused,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a flip starts, and again when a released drag hands over to
/// a timed settle.
#[derive(Clone, Copy, Debug)]
pub struct FlipStartEvent {
    /// Direction through the book.
    pub direction: FlipDirection,
    /// Direction of travel on screen.
    pub turn: Turn,
    /// Timed or gesture-driven.
    pub mode: FlipMode,
    /// Host time at the start.
    pub at: HostTime,
    /// Starting progression.
    pub progression: f64,
    /// Progression the flip is heading for (gestural flips report 1).
    pub target: f64,
    /// Planned duration (zero for gestural flips).
    pub duration: Duration,
    /// Section of the page being turned.
    pub turning_section: usize,
}

/// Emitted every time a flip's geometry is recomputed.
#[derive(Clone, Copy, Debug)]
pub struct FlipFrameEvent {
    /// Host time of the frame or input event.
    pub at: HostTime,
    /// Current progression.
    pub progression: f64,
    /// Current fold angle in radians.
    pub fold_angle: f64,
    /// Timed or gesture-driven.
    pub mode: FlipMode,
}

/// Emitted when a flip comes to rest.
#[derive(Clone, Copy, Debug)]
pub struct FlipSettleEvent {
    /// Direction of the flip.
    pub direction: FlipDirection,
    /// Whether the flip committed or reverted.
    pub outcome: SettleOutcome,
    /// Host time of the settle.
    pub at: HostTime,
    /// Number of surfaces that left the window.
    pub retired: u32,
}

/// Emitted when a flip request is turned down.
#[derive(Clone, Copy, Debug)]
pub struct FlipRefusedEvent {
    /// Requested direction.
    pub direction: FlipDirection,
    /// Why the flip did not start.
    pub reason: FlipRefusal,
}

/// Emitted for every gesture input handled.
#[derive(Clone, Copy, Debug)]
pub struct GestureTraceEvent {
    /// Which input arrived.
    pub kind: GestureKind,
    /// Host time of the input.
    pub at: HostTime,
    /// Pointer x, for drag start and move.
    pub x: Option<f64>,
    /// Flip progression after handling the input, if a flip is active.
    pub progression: Option<f64>,
}

/// Emitted by the prefetch queue.
#[derive(Clone, Copy, Debug)]
pub struct PrefetchEvent {
    /// Section concerned.
    pub section: usize,
    /// Slot the section belongs to.
    pub slot: Slot,
    /// What happened.
    pub status: PrefetchStatus,
    /// Jobs still queued afterwards.
    pub pending: u32,
}

/// Emitted when a display request finishes.
#[derive(Clone, Copy, Debug)]
pub struct DisplayEvent {
    /// Requested section.
    pub section: usize,
    /// How it was served.
    pub status: DisplayStatus,
}

/// A per-frame style record of one flip participant.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct SurfaceStyleChange {
    /// Section shown by the surface.
    pub section: usize,
    /// Role in the flip.
    pub role: Role,
    /// Visible area after clipping.
    pub clip_area: f64,
    /// Shadow opacity, if the record casts one.
    pub shadow: Option<f64>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a flip starts or a drag hands over to a settle.
    fn on_flip_start(&mut self, e: &FlipStartEvent) {
        _ = e;
    }

    /// Called whenever flip geometry is recomputed.
    fn on_flip_frame(&mut self, e: &FlipFrameEvent) {
        _ = e;
    }

    /// Called when a flip commits or reverts.
    fn on_flip_settle(&mut self, e: &FlipSettleEvent) {
        _ = e;
    }

    /// Called when a flip request is refused.
    fn on_flip_refused(&mut self, e: &FlipRefusedEvent) {
        _ = e;
    }

    /// Called for every gesture input.
    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        _ = e;
    }

    /// Called by the prefetch queue.
    fn on_prefetch(&mut self, e: &PrefetchEvent) {
        _ = e;
    }

    /// Called when a display request finishes.
    fn on_display(&mut self, e: &DisplayEvent) {
        _ = e;
    }

    /// Called with per-frame participant styles (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_surface_styles(&mut self, at: HostTime, changes: &[SurfaceStyleChange]) {
        _ = (at, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $method:ident($ty:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`FlipStartEvent`].
        flip_start => on_flip_start(FlipStartEvent)
    );
    forward!(
        /// Emits a [`FlipFrameEvent`].
        flip_frame => on_flip_frame(FlipFrameEvent)
    );
    forward!(
        /// Emits a [`FlipSettleEvent`].
        flip_settle => on_flip_settle(FlipSettleEvent)
    );
    forward!(
        /// Emits a [`FlipRefusedEvent`].
        flip_refused => on_flip_refused(FlipRefusedEvent)
    );
    forward!(
        /// Emits a [`GestureTraceEvent`].
        gesture => on_gesture(GestureTraceEvent)
    );
    forward!(
        /// Emits a [`PrefetchEvent`].
        prefetch => on_prefetch(PrefetchEvent)
    );
    forward!(
        /// Emits a [`DisplayEvent`].
        display => on_display(DisplayEvent)
    );

    /// Emits participant styles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn surface_styles(&mut self, at: HostTime, changes: &[SurfaceStyleChange]) {
        if let Some(s) = &mut self.sink {
            s.on_surface_styles(at, changes);
        }
    }

    /// Whether events reach a sink. Lets callers skip building expensive
    /// payloads.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use folio_core::driver::{FlipMode, SettleOutcome};
use folio_core::flip::{FlipDirection, Role};
use folio_core::time::{HostTime, Timebase};
use folio_core::trace::{
    DisplayEvent, DisplayStatus, FlipFrameEvent, FlipRefusedEvent, FlipSettleEvent,
    FlipStartEvent, GestureKind, GestureTraceEvent, PrefetchEvent, PrefetchStatus,
    SurfaceStyleChange, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink, returning the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_ms(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1_000_000.0
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.ticks_to_ms(t.ticks())
    }
}

fn direction_name(direction: FlipDirection) -> &'static str {
    match direction {
        FlipDirection::Forward => "forward",
        FlipDirection::Backward => "backward",
    }
}

fn mode_name(mode: FlipMode) -> &'static str {
    match mode {
        FlipMode::Timed => "timed",
        FlipMode::Gestural => "gestural",
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Turning => "turning",
        Role::Revealed => "revealed",
        Role::Underneath => "underneath",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_flip_start(&mut self, e: &FlipStartEvent) {
        let _ = writeln!(
            self.writer,
            "[flip:start] {} {} section={} at {:.3}ms p={:.3}→{:.0} over {:.1}ms",
            direction_name(e.direction),
            mode_name(e.mode),
            e.turning_section,
            self.host_ms(e.at),
            e.progression,
            e.target,
            self.ticks_to_ms(e.duration.ticks()),
        );
    }

    fn on_flip_frame(&mut self, e: &FlipFrameEvent) {
        let _ = writeln!(
            self.writer,
            "[flip:frame] {} at {:.3}ms p={:.3} angle={:.1}°",
            mode_name(e.mode),
            self.host_ms(e.at),
            e.progression,
            e.fold_angle.to_degrees(),
        );
    }

    fn on_flip_settle(&mut self, e: &FlipSettleEvent) {
        let outcome = match e.outcome {
            SettleOutcome::Committed => "committed",
            SettleOutcome::Reverted => "reverted",
        };
        let _ = writeln!(
            self.writer,
            "[flip:settle] {} {outcome} at {:.3}ms retired={}",
            direction_name(e.direction),
            self.host_ms(e.at),
            e.retired,
        );
    }

    fn on_flip_refused(&mut self, e: &FlipRefusedEvent) {
        let _ = writeln!(
            self.writer,
            "[flip:refused] {} reason={}",
            direction_name(e.direction),
            e.reason,
        );
    }

    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        let kind = match e.kind {
            GestureKind::DragStart => "drag-start",
            GestureKind::DragMove => "drag-move",
            GestureKind::DragEnd => "drag-end",
            GestureKind::Swipe => "swipe",
        };
        let x = e.x.map_or_else(|| String::from("-"), |x| format!("{x:.1}"));
        let p = e
            .progression
            .map_or_else(|| String::from("-"), |p| format!("{p:.3}"));
        let _ = writeln!(
            self.writer,
            "[gesture] {kind} at {:.3}ms x={x} p={p}",
            self.host_ms(e.at),
        );
    }

    fn on_prefetch(&mut self, e: &PrefetchEvent) {
        let status = match e.status {
            PrefetchStatus::Queued => "queued",
            PrefetchStatus::Loaded => "loaded",
            PrefetchStatus::Skipped => "skipped",
            PrefetchStatus::Failed => "FAILED",
        };
        let _ = writeln!(
            self.writer,
            "[prefetch] {status} section={} slot={:?} pending={}",
            e.section, e.slot, e.pending,
        );
    }

    fn on_display(&mut self, e: &DisplayEvent) {
        let status = match e.status {
            DisplayStatus::Seeked => "seeked",
            DisplayStatus::Built => "built",
            DisplayStatus::Failed => "FAILED",
            DisplayStatus::Refused => "refused",
        };
        let _ = writeln!(self.writer, "[display] section={} {status}", e.section);
    }

    fn on_surface_styles(&mut self, at: HostTime, changes: &[SurfaceStyleChange]) {
        let _ = write!(self.writer, "[styles] at {:.3}ms", self.host_ms(at));
        for c in changes {
            let _ = write!(
                self.writer,
                " {}:{}={:.0}",
                role_name(c.role),
                c.section,
                c.clip_area,
            );
        }
        let _ = writeln!(self.writer);
    }
}

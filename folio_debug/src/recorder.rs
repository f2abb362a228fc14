// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_surface_styles`](TraceSink::on_surface_styles)) store
//! only the count.

use folio_core::driver::{FlipMode, SettleOutcome};
use folio_core::flip::{FlipDirection, FlipRefusal, Slot};
use folio_core::geometry::Turn;
use folio_core::time::{Duration, HostTime};
use folio_core::trace::{
    DisplayEvent, DisplayStatus, FlipFrameEvent, FlipRefusedEvent, FlipSettleEvent,
    FlipStartEvent, GestureKind, GestureTraceEvent, PrefetchEvent, PrefetchStatus,
    SurfaceStyleChange, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FLIP_START: u8 = 1;
const TAG_FLIP_FRAME: u8 = 2;
const TAG_FLIP_SETTLE: u8 = 3;
const TAG_FLIP_REFUSED: u8 = 4;
const TAG_GESTURE: u8 = 5;
const TAG_PREFETCH: u8 = 6;
const TAG_DISPLAY: u8 = 7;
const TAG_SURFACE_STYLES_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_index(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    fn write_option_f64(&mut self, v: Option<f64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_f64(val);
            }
            None => {
                self.write_u8(0);
                self.write_f64(0.0);
            }
        }
    }

    fn write_direction(&mut self, d: FlipDirection) {
        self.write_u8(match d {
            FlipDirection::Forward => 0,
            FlipDirection::Backward => 1,
        });
    }

    fn write_turn(&mut self, t: Turn) {
        self.write_u8(match t {
            Turn::TowardLeft => 0,
            Turn::TowardRight => 1,
        });
    }

    fn write_mode(&mut self, m: FlipMode) {
        self.write_u8(match m {
            FlipMode::Timed => 0,
            FlipMode::Gestural => 1,
        });
    }

    fn write_slot(&mut self, s: Slot) {
        self.write_u8(match s {
            Slot::Prev2 => 0,
            Slot::Prev1 => 1,
            Slot::ReadableLeft => 2,
            Slot::ReadableRight => 3,
            Slot::Next1 => 4,
            Slot::Next2 => 5,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_flip_start(&mut self, e: &FlipStartEvent) {
        self.write_u8(TAG_FLIP_START);
        self.write_direction(e.direction);
        self.write_turn(e.turn);
        self.write_mode(e.mode);
        self.write_u64(e.at.ticks());
        self.write_f64(e.progression);
        self.write_f64(e.target);
        self.write_u64(e.duration.ticks());
        self.write_index(e.turning_section);
    }

    fn on_flip_frame(&mut self, e: &FlipFrameEvent) {
        self.write_u8(TAG_FLIP_FRAME);
        self.write_u64(e.at.ticks());
        self.write_f64(e.progression);
        self.write_f64(e.fold_angle);
        self.write_mode(e.mode);
    }

    fn on_flip_settle(&mut self, e: &FlipSettleEvent) {
        self.write_u8(TAG_FLIP_SETTLE);
        self.write_direction(e.direction);
        self.write_u8(match e.outcome {
            SettleOutcome::Committed => 0,
            SettleOutcome::Reverted => 1,
        });
        self.write_u64(e.at.ticks());
        self.write_u32(e.retired);
    }

    fn on_flip_refused(&mut self, e: &FlipRefusedEvent) {
        self.write_u8(TAG_FLIP_REFUSED);
        self.write_direction(e.direction);
        self.write_u8(match e.reason {
            FlipRefusal::Busy => 0,
            FlipRefusal::MissingTurning => 1,
            FlipRefusal::MissingNeighbor => 2,
        });
    }

    fn on_gesture(&mut self, e: &GestureTraceEvent) {
        self.write_u8(TAG_GESTURE);
        self.write_u8(match e.kind {
            GestureKind::DragStart => 0,
            GestureKind::DragMove => 1,
            GestureKind::DragEnd => 2,
            GestureKind::Swipe => 3,
        });
        self.write_u64(e.at.ticks());
        self.write_option_f64(e.x);
        self.write_option_f64(e.progression);
    }

    fn on_prefetch(&mut self, e: &PrefetchEvent) {
        self.write_u8(TAG_PREFETCH);
        self.write_index(e.section);
        self.write_slot(e.slot);
        self.write_u8(match e.status {
            PrefetchStatus::Queued => 0,
            PrefetchStatus::Loaded => 1,
            PrefetchStatus::Skipped => 2,
            PrefetchStatus::Failed => 3,
        });
        self.write_u32(e.pending);
    }

    fn on_display(&mut self, e: &DisplayEvent) {
        self.write_u8(TAG_DISPLAY);
        self.write_index(e.section);
        self.write_u8(match e.status {
            DisplayStatus::Seeked => 0,
            DisplayStatus::Built => 1,
            DisplayStatus::Failed => 2,
            DisplayStatus::Refused => 3,
        });
    }

    fn on_surface_styles(&mut self, at: HostTime, changes: &[SurfaceStyleChange]) {
        self.write_u8(TAG_SURFACE_STYLES_COUNT);
        self.write_u64(at.ticks());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "style change count capped at u32::MAX for recording"
        )]
        self.write_u32(changes.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FlipStartEvent`].
    FlipStart(FlipStartEvent),
    /// A [`FlipFrameEvent`].
    FlipFrame(FlipFrameEvent),
    /// A [`FlipSettleEvent`].
    FlipSettle(FlipSettleEvent),
    /// A [`FlipRefusedEvent`].
    FlipRefused(FlipRefusedEvent),
    /// A [`GestureTraceEvent`].
    Gesture(GestureTraceEvent),
    /// A [`PrefetchEvent`].
    Prefetch(PrefetchEvent),
    /// A [`DisplayEvent`].
    Display(DisplayEvent),
    /// Participant style count for a frame.
    SurfaceStylesCount {
        /// Host time of the frame.
        at: HostTime,
        /// Number of participant records.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_index(&mut self) -> Option<usize> {
        usize::try_from(self.read_u64()?).ok()
    }

    fn read_option_f64(&mut self) -> Option<Option<f64>> {
        let present = self.read_u8()?;
        let val = self.read_f64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_direction(&mut self) -> Option<FlipDirection> {
        Some(match self.read_u8()? {
            0 => FlipDirection::Forward,
            _ => FlipDirection::Backward,
        })
    }

    fn read_turn(&mut self) -> Option<Turn> {
        Some(match self.read_u8()? {
            0 => Turn::TowardLeft,
            _ => Turn::TowardRight,
        })
    }

    fn read_mode(&mut self) -> Option<FlipMode> {
        Some(match self.read_u8()? {
            0 => FlipMode::Timed,
            _ => FlipMode::Gestural,
        })
    }

    fn read_slot(&mut self) -> Option<Slot> {
        Slot::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn decode_flip_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FlipStart(FlipStartEvent {
            direction: self.read_direction()?,
            turn: self.read_turn()?,
            mode: self.read_mode()?,
            at: HostTime(self.read_u64()?),
            progression: self.read_f64()?,
            target: self.read_f64()?,
            duration: Duration(self.read_u64()?),
            turning_section: self.read_index()?,
        }))
    }

    fn decode_flip_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FlipFrame(FlipFrameEvent {
            at: HostTime(self.read_u64()?),
            progression: self.read_f64()?,
            fold_angle: self.read_f64()?,
            mode: self.read_mode()?,
        }))
    }

    fn decode_flip_settle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FlipSettle(FlipSettleEvent {
            direction: self.read_direction()?,
            outcome: match self.read_u8()? {
                0 => SettleOutcome::Committed,
                _ => SettleOutcome::Reverted,
            },
            at: HostTime(self.read_u64()?),
            retired: self.read_u32()?,
        }))
    }

    fn decode_flip_refused(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FlipRefused(FlipRefusedEvent {
            direction: self.read_direction()?,
            reason: match self.read_u8()? {
                0 => FlipRefusal::Busy,
                1 => FlipRefusal::MissingTurning,
                _ => FlipRefusal::MissingNeighbor,
            },
        }))
    }

    fn decode_gesture(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Gesture(GestureTraceEvent {
            kind: match self.read_u8()? {
                0 => GestureKind::DragStart,
                1 => GestureKind::DragMove,
                2 => GestureKind::DragEnd,
                _ => GestureKind::Swipe,
            },
            at: HostTime(self.read_u64()?),
            x: self.read_option_f64()?,
            progression: self.read_option_f64()?,
        }))
    }

    fn decode_prefetch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Prefetch(PrefetchEvent {
            section: self.read_index()?,
            slot: self.read_slot()?,
            status: match self.read_u8()? {
                0 => PrefetchStatus::Queued,
                1 => PrefetchStatus::Loaded,
                2 => PrefetchStatus::Skipped,
                _ => PrefetchStatus::Failed,
            },
            pending: self.read_u32()?,
        }))
    }

    fn decode_display(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Display(DisplayEvent {
            section: self.read_index()?,
            status: match self.read_u8()? {
                0 => DisplayStatus::Seeked,
                1 => DisplayStatus::Built,
                2 => DisplayStatus::Failed,
                _ => DisplayStatus::Refused,
            },
        }))
    }

    fn decode_surface_styles_count(&mut self) -> Option<RecordedEvent> {
        let at = HostTime(self.read_u64()?);
        let count = self.read_u32()?;
        Some(RecordedEvent::SurfaceStylesCount { at, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FLIP_START => self.decode_flip_start(),
            TAG_FLIP_FRAME => self.decode_flip_frame(),
            TAG_FLIP_SETTLE => self.decode_flip_settle(),
            TAG_FLIP_REFUSED => self.decode_flip_refused(),
            TAG_GESTURE => self.decode_gesture(),
            TAG_PREFETCH => self.decode_prefetch(),
            TAG_DISPLAY => self.decode_display(),
            TAG_SURFACE_STYLES_COUNT => self.decode_surface_styles_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::flip::Role;

    fn sample_start() -> FlipStartEvent {
        FlipStartEvent {
            direction: FlipDirection::Backward,
            turn: Turn::TowardRight,
            mode: FlipMode::Gestural,
            at: HostTime(1_000_000),
            progression: 0.125,
            target: 1.0,
            duration: Duration(0),
            turning_section: 12,
        }
    }

    #[test]
    fn flip_start_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = sample_start();
        rec.on_flip_start(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1, "one record in, one out");
        match &events[0] {
            RecordedEvent::FlipStart(e) => {
                assert_eq!(e.direction, orig.direction);
                assert_eq!(e.turn, orig.turn);
                assert_eq!(e.mode, orig.mode);
                assert_eq!(e.at, orig.at);
                assert_eq!(e.progression.to_bits(), orig.progression.to_bits());
                assert_eq!(e.duration, orig.duration);
                assert_eq!(e.turning_section, 12);
            }
            other => panic!("expected FlipStart, got {other:?}"),
        }
    }

    #[test]
    fn gesture_keeps_missing_fields_missing() {
        let mut rec = RecorderSink::new();
        rec.on_gesture(&GestureTraceEvent {
            kind: GestureKind::DragEnd,
            at: HostTime(42),
            x: None,
            progression: Some(0.5),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::Gesture(e)] => {
                assert_eq!(e.kind, GestureKind::DragEnd);
                assert_eq!(e.x, None);
                assert_eq!(e.progression, Some(0.5));
            }
            other => panic!("expected one Gesture, got {other:?}"),
        }
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_display(&DisplayEvent {
            section: 0,
            status: DisplayStatus::Built,
        });
        rec.on_prefetch(&PrefetchEvent {
            section: 1,
            slot: Slot::Next1,
            status: PrefetchStatus::Queued,
            pending: 1,
        });
        rec.on_flip_start(&sample_start());
        rec.on_flip_frame(&FlipFrameEvent {
            at: HostTime(1_016_000),
            progression: 0.2,
            fold_angle: 0.4,
            mode: FlipMode::Gestural,
        });
        rec.on_flip_refused(&FlipRefusedEvent {
            direction: FlipDirection::Forward,
            reason: FlipRefusal::Busy,
        });
        rec.on_flip_settle(&FlipSettleEvent {
            direction: FlipDirection::Backward,
            outcome: SettleOutcome::Reverted,
            at: HostTime(1_400_000),
            retired: 0,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 6);
        assert!(matches!(
            events[0],
            RecordedEvent::Display(DisplayEvent {
                section: 0,
                status: DisplayStatus::Built
            })
        ));
        match &events[1] {
            RecordedEvent::Prefetch(e) => {
                assert_eq!(e.slot, Slot::Next1);
                assert_eq!(e.status, PrefetchStatus::Queued);
            }
            other => panic!("expected Prefetch, got {other:?}"),
        }
        assert!(matches!(events[2], RecordedEvent::FlipStart(_)));
        assert!(matches!(events[3], RecordedEvent::FlipFrame(_)));
        assert!(matches!(
            events[4],
            RecordedEvent::FlipRefused(FlipRefusedEvent {
                reason: FlipRefusal::Busy,
                ..
            })
        ));
        match &events[5] {
            RecordedEvent::FlipSettle(e) => {
                assert_eq!(e.outcome, SettleOutcome::Reverted);
                assert_eq!(e.at, HostTime(1_400_000));
            }
            other => panic!("expected FlipSettle, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty(), "no bytes, no events");
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_flip_start(&sample_start());
        rec.on_flip_start(&sample_start());
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1, "the partial record is dropped");
    }

    #[test]
    fn surface_styles_store_count() {
        let mut rec = RecorderSink::new();
        let changes = [
            SurfaceStyleChange {
                section: 4,
                role: Role::Turning,
                clip_area: 100.0,
                shadow: None,
            },
            SurfaceStyleChange {
                section: 5,
                role: Role::Revealed,
                clip_area: 20.0,
                shadow: Some(0.6),
            },
        ];
        rec.on_surface_styles(HostTime(9), &changes);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::SurfaceStylesCount { at, count }] => {
                assert_eq!(*at, HostTime(9));
                assert_eq!(*count, 2);
            }
            other => panic!("expected SurfaceStylesCount, got {other:?}"),
        }
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each flip becomes a duration slice from its start to its settle, with the
//! progression and fold angle as counter tracks. Prefetch and display events
//! carry no timestamp of their own; they are placed at the last time seen in
//! the recording.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use folio_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

const TID_FLIP: u32 = 0;
const TID_INPUT: u32 = 1;
const TID_LOADING: u32 = 2;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FlipStart(e) => {
                last_ts = ticks_to_us(e.at.ticks(), timebase);
                // A released drag reports a second start; the slice stays open.
                if e.mode == folio_core::driver::FlipMode::Timed && e.progression > 0.0 {
                    events.push(json!({
                        "ph": "i",
                        "name": "Release",
                        "cat": "Flip",
                        "ts": last_ts,
                        "pid": 0,
                        "tid": TID_FLIP,
                        "s": "t",
                        "args": {
                            "from": e.progression,
                            "target": e.target,
                            "duration_us": ticks_to_us(e.duration.ticks(), timebase),
                        }
                    }));
                    continue;
                }
                events.push(json!({
                    "ph": "B",
                    "name": format!("Flip {:?}", e.direction),
                    "cat": "Flip",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FLIP,
                    "args": {
                        "mode": format!("{:?}", e.mode),
                        "turn": format!("{:?}", e.turn),
                        "section": e.turning_section,
                        "duration_us": ticks_to_us(e.duration.ticks(), timebase),
                    }
                }));
            }
            RecordedEvent::FlipFrame(e) => {
                last_ts = ticks_to_us(e.at.ticks(), timebase);
                events.push(json!({
                    "ph": "C",
                    "name": "Progression",
                    "cat": "Flip",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FLIP,
                    "args": {
                        "progression": e.progression,
                        "fold_angle": e.fold_angle,
                    }
                }));
            }
            RecordedEvent::FlipSettle(e) => {
                last_ts = ticks_to_us(e.at.ticks(), timebase);
                events.push(json!({
                    "ph": "E",
                    "name": format!("Flip {:?}", e.direction),
                    "cat": "Flip",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FLIP,
                    "args": {
                        "outcome": format!("{:?}", e.outcome),
                        "retired": e.retired,
                    }
                }));
            }
            RecordedEvent::FlipRefused(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Refused",
                    "cat": "Flip",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FLIP,
                    "s": "t",
                    "args": {
                        "direction": format!("{:?}", e.direction),
                        "reason": e.reason.as_str(),
                    }
                }));
            }
            RecordedEvent::Gesture(e) => {
                last_ts = ticks_to_us(e.at.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.kind),
                    "cat": "Input",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_INPUT,
                    "s": "t",
                    "args": {
                        "x": e.x,
                        "progression": e.progression,
                    }
                }));
            }
            RecordedEvent::Prefetch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Prefetch {:?}", e.status),
                    "cat": "Loading",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_LOADING,
                    "s": "t",
                    "args": {
                        "section": e.section,
                        "slot": format!("{:?}", e.slot),
                        "pending": e.pending,
                    }
                }));
            }
            RecordedEvent::Display(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Display {:?}", e.status),
                    "cat": "Loading",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_LOADING,
                    "s": "p",
                    "args": {
                        "section": e.section,
                    }
                }));
            }
            RecordedEvent::SurfaceStylesCount { at, count } => {
                last_ts = ticks_to_us(at.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "SurfaceStyles",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FLIP,
                    "s": "t",
                    "args": {
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use folio_core::driver::{FlipMode, SettleOutcome};
    use folio_core::flip::{FlipDirection, Slot};
    use folio_core::geometry::Turn;
    use folio_core::time::{Duration, HostTime};
    use folio_core::trace::{
        FlipFrameEvent, FlipSettleEvent, FlipStartEvent, PrefetchEvent, PrefetchStatus, TraceSink,
    };

    fn start(at: u64, mode: FlipMode, progression: f64) -> FlipStartEvent {
        FlipStartEvent {
            direction: FlipDirection::Forward,
            turn: Turn::TowardLeft,
            mode,
            at: HostTime(at),
            progression,
            target: 1.0,
            duration: Duration(400_000_000),
            turning_section: 3,
        }
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_flip_start(&start(1_000_000, FlipMode::Timed, 0.0));
        rec.on_flip_frame(&FlipFrameEvent {
            at: HostTime(1_016_000),
            progression: 0.1,
            fold_angle: 0.5,
            mode: FlipMode::Timed,
        });
        rec.on_prefetch(&PrefetchEvent {
            section: 6,
            slot: Slot::Next1,
            status: PrefetchStatus::Queued,
            pending: 1,
        });
        rec.on_flip_settle(&FlipSettleEvent {
            direction: FlipDirection::Forward,
            outcome: SettleOutcome::Committed,
            at: HostTime(1_400_000),
            retired: 2,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4, "one trace event per record");

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Flip Forward");
        assert_eq!(parsed[1]["ph"], "C");
        assert_eq!(parsed[1]["args"]["progression"], 0.1);
        assert_eq!(parsed[2]["ts"], 1016.0, "untimed events reuse the last time");
        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[3]["name"], parsed[0]["name"], "slice closes");
    }

    #[test]
    fn released_drag_is_an_instant_inside_the_slice() {
        let mut rec = RecorderSink::new();
        rec.on_flip_start(&start(0, FlipMode::Gestural, 0.0));
        rec.on_flip_start(&start(500_000, FlipMode::Timed, 0.3));

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Release");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "no records, empty array");
    }
}

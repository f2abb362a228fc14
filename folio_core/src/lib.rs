// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-turn state machine, fold geometry and spread management for
//! two-page book viewers.
//!
//! `folio_core` keeps a window of up to six loaded pages around a two-page
//! spread and animates turning a page from one side to the other, either on a
//! timer or following a pointer drag. It is `no_std` compatible (with
//! `alloc`); content loading and painting are left to a backend.
//!
//! # Architecture
//!
//! ```text
//!   Backend (tick source, gestures)
//!       │
//!       ▼
//!   SpreadManager ──► AnimationDriver ──► flip table + geometry
//!       │                                        │
//!       │               ┌────────────────────────┘
//!       │               ▼
//!       │   SurfaceCollection::evaluate() ──► SpreadChanges ──► Presenter::apply()
//!       ▼
//!   PrefetchManager ──► SurfaceLoader
//! ```
//!
//! **[`geometry`]**: pure fold geometry. Progression and page size in, clip
//! polygons, transforms, shadow and shine out.
//!
//! **[`flip`]**: slot and phase of every surface and the transition table
//! for forward and backward flips, in either reading direction.
//!
//! **[`driver`]**: the single in-flight flip, advanced by frame time or by
//! pointer displacement, committed or reverted when it settles.
//!
//! **[`spread`]**: the public entry point. Display, next/prev, gestures,
//! resize, location and visibility queries.
//!
//! **[`prefetch`]**: serial loading of the staged pages around the spread.
//!
//! **[`surface`]**: the ordered surface collection with generational handles
//! and dirty tracking via `understory_dirty` ([`dirty`]).
//!
//! **[`backend`]**: traits a platform implements: content surfaces, their
//! loader, and the presenter.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-frame
//!   participant style events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod config;
pub mod dirty;
pub mod driver;
pub mod easing;
pub mod flip;
pub mod geometry;
pub mod gesture;
pub mod idle;
pub mod prefetch;
pub mod section;
pub mod spread;
pub mod style;
pub mod surface;
pub mod time;
pub mod timing;
pub mod trace;
pub mod transform;

#[cfg(test)]
mod test_support;

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for folio.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: on-demand `requestAnimationFrame` tick source
//! - [`DomPresenter`]: one absolutely positioned `<div>` per page surface
//! - [`css`]: conversion of style records to CSS property values
//!
//! Host times are microsecond ticks from `performance.now()`; pair them with
//! [`FlipConfig::web`](folio_core::config::FlipConfig::web).

#![no_std]

extern crate alloc;

pub mod css;
mod presenter;
mod raf;

pub use folio_core::backend::Presenter;
pub use presenter::{DomPresenter, PAGE_CLASS};
pub use raf::RafLoop;

use folio_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    raf::host_time(raf::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

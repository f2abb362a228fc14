// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` tick source.
//!
//! A resting spread needs no frames, so [`RafLoop`] runs on demand: the
//! callback reports whether another frame is wanted, and the loop parks
//! itself once it is not. Pointer handlers and display calls
//! [`wake`](RafLoop::wake) it again.
//!
//! Timestamps are the [`DOMHighResTimeStamp`][mdn] passed to the callback,
//! converted to microsecond [`HostTime`] ticks. The browser reports no refresh
//! interval, so ticks carry `refresh_interval: None`.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use folio_core::time::HostTime;
use folio_core::timing::FrameTick;

// Global bindings; no Window/Performance lookup per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Converts a `DOMHighResTimeStamp` in milliseconds to host ticks.
pub(crate) fn host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "browser timestamps are small positive f64; µs fits in u64"
    )]
    let us = (ms.max(0.0) * 1000.0) as u64;
    HostTime(us)
}

type FrameCallback = Box<dyn FnMut(FrameTick) -> bool>;

struct Shared {
    /// JS closure handed to `requestAnimationFrame`; built once, reused.
    js: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    frame: RefCell<FrameCallback>,
    next_index: Cell<u64>,
    /// Handle of the pending request, if one is scheduled.
    pending: Cell<Option<i32>>,
}

impl Shared {
    fn schedule(&self) {
        if self.pending.get().is_some() {
            return;
        }
        if let Some(js) = &*self.js.borrow() {
            self.pending
                .set(Some(request_animation_frame(js.as_ref().unchecked_ref())));
        }
    }

    fn on_frame(&self, timestamp_ms: f64) {
        self.pending.set(None);
        let index = self.next_index.get();
        self.next_index.set(index + 1);

        let again = (self.frame.borrow_mut())(FrameTick::new(host_time(timestamp_ms), index));
        if again {
            self.schedule();
        }
    }

    fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            cancel_animation_frame(id);
        }
    }
}

/// An on-demand `requestAnimationFrame` loop that emits [`FrameTick`]s.
///
/// The callback returns `true` while it wants more frames, typically
/// `spread.is_flipping()` or pending prefetch work. Dropping the loop cancels
/// any scheduled frame.
pub struct RafLoop {
    shared: Rc<Shared>,
}

impl RafLoop {
    /// Creates a parked loop. Call [`wake`](Self::wake) to request the first
    /// frame.
    pub fn new(frame: impl FnMut(FrameTick) -> bool + 'static) -> Self {
        let shared = Rc::new(Shared {
            js: RefCell::new(None),
            frame: RefCell::new(Box::new(frame)),
            next_index: Cell::new(0),
            pending: Cell::new(None),
        });

        // The closure holds a weak handle so the loop and its JS callback do
        // not keep each other alive.
        let weak = Rc::downgrade(&shared);
        let js = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame(timestamp_ms);
            }
        }) as Box<dyn FnMut(f64)>);
        *shared.js.borrow_mut() = Some(js);

        Self { shared }
    }

    /// Schedules a frame unless one is already pending.
    pub fn wake(&self) {
        self.shared.schedule();
    }

    /// Cancels the pending frame, if any.
    pub fn park(&self) {
        self.shared.cancel();
    }

    /// Whether a frame is scheduled.
    #[must_use]
    pub fn is_awake(&self) -> bool {
        self.shared.pending.get().is_some()
    }

    /// Number of frames delivered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.shared.next_index.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.shared.cancel();
        self.shared.js.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("awake", &self.is_awake())
            .field("frames", &self.frames())
            .finish()
    }
}

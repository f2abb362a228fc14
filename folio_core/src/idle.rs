// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Completion signal for "wait until no flip is in flight".
//!
//! The spread manager marks the signal busy when a flip starts and settles it
//! (publishing the new location) when the flip commits or reverts, and after
//! every `display`. Waiting tasks are woken exactly then; nothing polls.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};

/// Sections shown by the current spread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SpreadLocation {
    /// Section on the left readable slot, if any.
    pub left: Option<usize>,
    /// Section on the right readable slot, if any.
    pub right: Option<usize>,
}

impl SpreadLocation {
    /// The first section of the spread in reading order.
    #[must_use]
    pub fn start(&self) -> Option<usize> {
        self.left.or(self.right)
    }
}

#[derive(Debug, Default)]
struct Inner {
    busy: bool,
    location: Option<SpreadLocation>,
    wakers: Vec<Waker>,
}

/// Shared idle state. Cloning yields another handle to the same signal.
#[derive(Clone, Debug, Default)]
pub struct IdleSignal(Rc<RefCell<Inner>>);

impl IdleSignal {
    /// Creates an idle signal with no published location.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a flip as in flight.
    pub fn set_busy(&self) {
        self.0.borrow_mut().busy = true;
    }

    /// Publishes `location`, clears the busy flag and wakes every waiter.
    pub fn settle(&self, location: SpreadLocation) {
        let wakers = {
            let mut inner = self.0.borrow_mut();
            inner.busy = false;
            inner.location = Some(location);
            core::mem::take(&mut inner.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    /// Whether a flip is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.borrow().busy
    }

    /// The last published location.
    #[must_use]
    pub fn location(&self) -> Option<SpreadLocation> {
        self.0.borrow().location
    }

    /// A future resolving to the location once no flip is in flight.
    #[must_use]
    pub fn wait(&self) -> CurrentLocation {
        CurrentLocation {
            signal: self.clone(),
        }
    }

    #[cfg(test)]
    fn waiters(&self) -> usize {
        self.0.borrow().wakers.len()
    }
}

/// Future returned by [`IdleSignal::wait`].
///
/// Resolves to `None` when nothing has been displayed yet.
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct CurrentLocation {
    signal: IdleSignal,
}

impl Future for CurrentLocation {
    type Output = Option<SpreadLocation>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.signal.0.borrow_mut();
        if !inner.busy {
            return Poll::Ready(inner.location);
        }
        if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            inner.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

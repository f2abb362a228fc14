// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! [`SurfaceCollection`](crate::surface::SurfaceCollection) records what
//! changed about each surface since the last
//! [`evaluate`](crate::surface::SurfaceCollection::evaluate) using
//! [`understory_dirty`]. Surfaces do not form a hierarchy, so every channel
//! is local: only the surface that was explicitly marked shows up in the
//! drain output.
//!
//! Callers never query dirty state directly. Draining happens inside
//! `evaluate`, which reports the result as
//! [`SpreadChanges`](crate::surface::SpreadChanges) for a
//! [`Presenter`](crate::backend::Presenter) to consume.

use understory_dirty::Channel;

/// Per-frame style or slot state changed.
pub const STYLE: Channel = Channel::new(0);

/// Static slot layout changed (resize, promotion after a flip).
pub const LAYOUT: Channel = Channel::new(1);

/// The surface was shown or hidden.
pub const VISIBILITY: Channel = Channel::new(2);

/// Surfaces were added, removed, or reordered.
pub const TOPOLOGY: Channel = Channel::new(3);

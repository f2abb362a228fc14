// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface data model.
//!
//! A *surface* is a loaded page of content in the spread window. Each
//! surface has:
//!
//! - An identity ([`SurfaceId`]): a generational handle that becomes stale
//!   once the surface is retired.
//! - A [`Section`](crate::section::Section), whose index orders the
//!   [`SurfaceCollection`].
//! - A slot and phase ([`SurfaceState`](crate::flip::SurfaceState)).
//! - A static [`SlotLayout`] and, while it takes part in a flip, a per-frame
//!   [`StyleRecord`](crate::style::StyleRecord).
//!
//! # Dirty tracking
//!
//! Mutations through the collection mark the matching
//! [`dirty`](crate::dirty) channel, and [`SurfaceCollection::evaluate`]
//! turns them into [`SpreadChanges`].

mod collection;
mod evaluate;
mod id;
mod layout;

pub use collection::{Surface, SurfaceCollection};
pub use evaluate::SpreadChanges;
pub use id::SurfaceId;
pub use layout::{SlotLayout, SpreadLayout};

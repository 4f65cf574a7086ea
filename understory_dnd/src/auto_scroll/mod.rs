// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-scroll while dragging.
//!
//! Two strategies share the overlap math in [`crate::scroll`]:
//!
//! - [`FluidScroller`] runs on every pointer move. The closer the dragged
//!   item's center gets to an edge of the viewport (or of the scrollable
//!   droppable under it), the faster it scrolls. Scrolls are delivered at most
//!   once per frame.
//! - [`jump_scroll`] handles keyboard moves that land off screen. The
//!   destination droppable scrolls first, then the window, and whatever neither
//!   can absorb moves the dragged item directly.
//!
//! Timestamps are plain milliseconds supplied by the caller, so the scroller
//! can be driven from any clock (or from a test).

mod config;
mod fluid;
mod jump;

pub use config::{AutoScrollConfig, DurationDampening};
pub use fluid::{FluidScrollChange, FluidScrollState, FluidScroller, fluid_scroll_change};
pub use jump::{JumpScrollActions, JumpScrollOutcome, JumpScrollState, jump_scroll};

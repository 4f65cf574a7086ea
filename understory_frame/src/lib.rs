// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_frame --heading-base-level=0

//! Understory Frame: injectable frame scheduling for single-threaded UI cores.
//!
//! Interaction engines often need to defer work to a rendering-frame boundary:
//! reads of layout in one frame, writes in the next, or coalescing a burst of
//! scroll requests into one per frame. Platform APIs for this
//! (`requestAnimationFrame`, vsync callbacks, winit redraws) differ wildly, and
//! tests want none of them.
//!
//! This crate provides:
//!
//! - [`FrameScheduler`]: the seam. `schedule` a boxed callback for the next
//!   frame and get a [`FrameHandle`] back; `cancel` it before it runs.
//! - [`ManualScheduler`]: an explicitly steppable scheduler for headless hosts
//!   and tests. Each [`ManualScheduler::step`] runs exactly the callbacks that
//!   were queued before the step began.
//! - [`FrameThrottle`]: "schedule, not queue". Calling
//!   [`FrameThrottle::schedule`] many times within one frame runs the wrapped
//!   callback once, with the most recent value.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_frame::{FrameThrottle, ManualScheduler};
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let seen = Rc::new(Cell::new(0));
//! let sink = seen.clone();
//! let throttle = FrameThrottle::new(scheduler.clone(), move |v: i32| sink.set(v));
//!
//! throttle.schedule(1);
//! throttle.schedule(2);
//! throttle.schedule(3);
//! assert_eq!(seen.get(), 0);
//!
//! scheduler.step();
//! // Only the latest value survives the frame.
//! assert_eq!(seen.get(), 3);
//! ```
//!
//! Everything here is single-threaded by construction (`Rc`/`RefCell`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;

mod manual;
mod throttle;

pub use manual::ManualScheduler;
pub use throttle::FrameThrottle;

/// Handle to a callback scheduled on a [`FrameScheduler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wraps a raw scheduler-specific id (for example a `requestAnimationFrame` id).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw scheduler-specific id.
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

/// A single-threaded, frame-aligned callback queue.
///
/// Implementations must never run a callback synchronously from within
/// [`schedule`](FrameScheduler::schedule); callers rely on deferral to keep
/// reads and writes in separate frames.
///
/// After [`cancel`](FrameScheduler::cancel) returns, the callback must not run.
/// Schedulers that cannot truly cancel (some platform APIs race) should still
/// drop the callback when it fires; callers in this workspace additionally
/// guard their callbacks with tokens.
pub trait FrameScheduler {
    /// Schedule `callback` to run at the next frame boundary.
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle;

    /// Cancel a previously scheduled callback. Unknown or already-run handles are ignored.
    fn cancel(&self, handle: FrameHandle);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        (**self).schedule(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        (**self).cancel(handle);
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &S {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        (**self).schedule(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        (**self).cancel(handle);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scheduler that only advances when told to.

use alloc::boxed::Box;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

use crate::{FrameHandle, FrameScheduler};

struct Queued {
    handle: FrameHandle,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    frame: u64,
    /// Callbacks waiting for the next step.
    queued: SmallVec<[Queued; 4]>,
    /// Callbacks of the step currently running.
    running: SmallVec<[Queued; 4]>,
}

/// An explicitly steppable [`FrameScheduler`].
///
/// Useful for headless hosts and deterministic tests. Callbacks scheduled while
/// a step is running are deferred to the following step, so a read-then-write
/// cycle that schedules its write from its read always takes two steps.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use understory_frame::{FrameScheduler, ManualScheduler};
///
/// let scheduler = Rc::new(ManualScheduler::new());
/// let log = Rc::new(RefCell::new(Vec::new()));
///
/// let (s, l) = (scheduler.clone(), log.clone());
/// scheduler.schedule(Box::new(move || {
///     l.borrow_mut().push("read");
///     let l = l.clone();
///     s.schedule(Box::new(move || l.borrow_mut().push("write")));
/// }));
///
/// assert_eq!(scheduler.step(), 1);
/// assert_eq!(*log.borrow(), ["read"]);
/// assert_eq!(scheduler.step(), 1);
/// assert_eq!(*log.borrow(), ["read", "write"]);
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<State>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("frame", &state.frame)
            .field("queued", &state.queued.len())
            .field("running", &state.running.len())
            .finish_non_exhaustive()
    }
}

impl ManualScheduler {
    /// Create an idle scheduler at frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame: every callback queued before this call, in scheduling order.
    ///
    /// Returns the number of callbacks that ran.
    pub fn step(&self) -> usize {
        let frame = {
            let mut state = self.state.borrow_mut();
            state.frame += 1;
            let queued = core::mem::take(&mut state.queued);
            state.running = queued;
            state.frame
        };

        let mut ran = 0;
        loop {
            // The borrow must end before the callback runs; callbacks schedule and cancel.
            let next = {
                let mut state = self.state.borrow_mut();
                if state.running.is_empty() {
                    None
                } else {
                    Some(state.running.remove(0))
                }
            };
            let Some(queued) = next else {
                break;
            };
            (queued.callback)();
            ran += 1;
        }

        tracing::trace!(target: "understory_frame", frame, ran, "stepped frame");
        ran
    }

    /// Step until nothing is queued or `max_steps` frames have run.
    ///
    /// Returns the number of frames stepped.
    pub fn flush(&self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.pending() > 0 {
            self.step();
            steps += 1;
        }
        steps
    }

    /// Number of callbacks waiting for the next step.
    pub fn pending(&self) -> usize {
        self.state.borrow().queued.len()
    }

    /// Number of frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.state.borrow().frame
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = FrameHandle(state.next_id);
        state.queued.push(Queued { handle, callback });
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        state.queued.retain(|q| q.handle != handle);
        state.running.retain(|q| q.handle != handle);
    }
}

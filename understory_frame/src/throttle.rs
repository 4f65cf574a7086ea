// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame coalescing of repeated calls.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use crate::{FrameHandle, FrameScheduler};

struct Slot<T> {
    latest: Option<T>,
    pending: Option<FrameHandle>,
    /// Bumped on every cancel so a late-firing frame can tell it was superseded.
    token: u64,
}

struct Shared<T> {
    slot: RefCell<Slot<T>>,
    callback: RefCell<Box<dyn FnMut(T)>>,
}

/// Wraps a callback so it runs at most once per frame with the latest value.
///
/// This is a "schedule, not queue" primitive: values passed to
/// [`schedule`](Self::schedule) within the same frame overwrite each other and
/// only the last one reaches the callback.
pub struct FrameThrottle<T: 'static> {
    shared: Rc<Shared<T>>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl<T: 'static> fmt::Debug for FrameThrottle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.shared.slot.borrow();
        f.debug_struct("FrameThrottle")
            .field("pending", &slot.pending)
            .field("has_value", &slot.latest.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> FrameThrottle<T> {
    /// Wrap `callback`, deferring it through `scheduler`.
    pub fn new(scheduler: Rc<dyn FrameScheduler>, callback: impl FnMut(T) + 'static) -> Self {
        Self {
            shared: Rc::new(Shared {
                slot: RefCell::new(Slot {
                    latest: None,
                    pending: None,
                    token: 0,
                }),
                callback: RefCell::new(Box::new(callback)),
            }),
            scheduler,
        }
    }

    /// Record `value` and make sure a frame is scheduled to deliver it.
    pub fn schedule(&self, value: T) {
        let token = {
            let mut slot = self.shared.slot.borrow_mut();
            slot.latest = Some(value);
            if slot.pending.is_some() {
                return;
            }
            slot.token
        };

        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        let handle = self.scheduler.schedule(Box::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let value = {
                let mut slot = shared.slot.borrow_mut();
                if slot.token != token || slot.pending.is_none() {
                    return;
                }
                slot.pending = None;
                slot.latest.take()
            };
            if let Some(value) = value {
                (shared.callback.borrow_mut())(value);
            }
        }));
        self.shared.slot.borrow_mut().pending = Some(handle);
    }

    /// Drop any value waiting for the next frame.
    ///
    /// Safe to call when nothing is pending.
    pub fn cancel(&self) {
        let pending = {
            let mut slot = self.shared.slot.borrow_mut();
            slot.latest = None;
            slot.token = slot.token.wrapping_add(1);
            slot.pending.take()
        };
        if let Some(handle) = pending {
            self.scheduler.cancel(handle);
        }
    }

    /// Whether a frame is scheduled to deliver a value.
    pub fn is_pending(&self) -> bool {
        self.shared.slot.borrow().pending.is_some()
    }
}

impl<T: 'static> Drop for FrameThrottle<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

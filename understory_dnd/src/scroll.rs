// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll bookkeeping and the overlap/scroll-capability math shared by both
//! auto-scroll strategies.
//!
//! Given a current scroll position, a maximum scroll position and a requested
//! change, the functions here answer two questions:
//!
//! - can the scroll container move *at all* in the requested direction
//!   ([`can_partially_scroll`]), and
//! - how much of the change would spill past `[0, max]`
//!   ([`get_overlap`]), so the remainder can be offered to a parent.
//!
//! Nothing here fails: "cannot scroll" is `false`, "everything fits" is `None`.

use kurbo::{Size, Vec2};

use crate::dimension::{DroppableDimension, Viewport};

/// A scroll change relative to the initial scroll of a drag.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollDiff {
    /// `current - initial`.
    pub value: Vec2,
    /// How far content visually moved because of the scroll (`-value`).
    pub displacement: Vec2,
}

/// Scroll state of a scroll container (a droppable frame or the window).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollDetails {
    /// Scroll when the dimension was captured.
    pub initial: Vec2,
    /// Latest known scroll.
    pub current: Vec2,
    /// Largest reachable scroll on each axis.
    pub max: Vec2,
    /// `current` relative to `initial`.
    pub diff: ScrollDiff,
}

impl ScrollDetails {
    /// Scroll details at capture time: `current == initial` and no diff.
    pub fn new(initial: Vec2, max: Vec2) -> Self {
        Self {
            initial,
            current: initial,
            max,
            diff: ScrollDiff::default(),
        }
    }

    /// Derive the details after scrolling to `new_scroll`.
    ///
    /// The requested scroll is clamped into `[0, max]` on both axes.
    #[must_use]
    pub fn scroll_to(&self, new_scroll: Vec2) -> Self {
        let current = clamp_scroll(new_scroll, self.max);
        let value = current - self.initial;
        Self {
            initial: self.initial,
            current,
            max: self.max,
            diff: ScrollDiff {
                value,
                displacement: -value,
            },
        }
    }
}

/// Clamp `scroll` into `[0, max]` on both axes.
pub fn clamp_scroll(scroll: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(
        scroll.x.min(max.x).max(0.0),
        scroll.y.min(max.y).max(0.0),
    )
}

/// Maximum scroll of a container with the given scrollable content size and
/// visible (padding box) size.
pub fn get_max_scroll(scroll_size: Size, client_size: Size) -> Vec2 {
    Vec2::new(
        (scroll_size.width - client_size.width).max(0.0),
        (scroll_size.height - client_size.height).max(0.0),
    )
}

fn signed_unit(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// The smallest change with the same sign as `change` on each axis.
fn smallest_signed(change: Vec2) -> Vec2 {
    Vec2::new(signed_unit(change.x), signed_unit(change.y))
}

fn remainder(target: f64, max: f64) -> f64 {
    if target < 0.0 {
        target
    } else if target > max {
        target - max
    } else {
        0.0
    }
}

/// The part of `change` that does not fit within `[0, max]` when applied to `current`.
///
/// Returns `None` exactly when `current + change` lies in `[0, max]` on both
/// axes; otherwise the signed excess past the nearest bound, per axis.
pub fn get_overlap(current: Vec2, max: Vec2, change: Vec2) -> Option<Vec2> {
    let target = current + change;
    let overlap = Vec2::new(remainder(target.x, max.x), remainder(target.y, max.y));
    if overlap == Vec2::ZERO {
        None
    } else {
        Some(overlap)
    }
}

/// Whether any part of `change` can be absorbed by a scroll container.
///
/// `max` is first raised to at least `current`: a cross-axis scrollbar can
/// leave `current` past the measured max, and that must not read as "stuck".
pub fn can_partially_scroll(current: Vec2, max: Vec2, change: Vec2) -> bool {
    let max = Vec2::new(max.x.max(current.x), max.y.max(current.y));
    let smallest = smallest_signed(change);
    let Some(overlap) = get_overlap(current, max, smallest) else {
        return true;
    };
    (smallest.x != 0.0 && overlap.x == 0.0) || (smallest.y != 0.0 && overlap.y == 0.0)
}

/// Whether the window can absorb any part of `change`.
pub fn can_scroll_window(viewport: &Viewport, change: Vec2) -> bool {
    can_partially_scroll(viewport.scroll.current, viewport.scroll.max, change)
}

/// Whether `droppable` has a scroll frame that can absorb any part of `change`.
pub fn can_scroll_droppable(droppable: &DroppableDimension, change: Vec2) -> bool {
    droppable
        .frame
        .as_ref()
        .is_some_and(|frame| can_partially_scroll(frame.scroll.current, frame.scroll.max, change))
}

/// The part of `change` the window cannot absorb.
///
/// `None` when the window cannot scroll in that direction at all, or when the
/// whole change fits. Check [`can_scroll_window`] first to tell them apart.
pub fn get_window_overlap(viewport: &Viewport, change: Vec2) -> Option<Vec2> {
    if !can_scroll_window(viewport, change) {
        return None;
    }
    get_overlap(viewport.scroll.current, viewport.scroll.max, change)
}

/// The part of `change` the droppable's frame cannot absorb.
///
/// Same `None` convention as [`get_window_overlap`].
pub fn get_droppable_overlap(droppable: &DroppableDimension, change: Vec2) -> Option<Vec2> {
    if !can_scroll_droppable(droppable, change) {
        return None;
    }
    let frame = droppable.frame.as_ref()?;
    get_overlap(frame.scroll.current, frame.scroll.max, change)
}

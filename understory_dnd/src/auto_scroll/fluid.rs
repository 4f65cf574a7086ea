// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};
use understory_frame::{FrameScheduler, FrameThrottle};

use super::AutoScrollConfig;
use crate::dimension::{DimensionMap, DraggableId, DroppableDimension, DroppableId, Viewport};
use crate::geometry::{Axis, is_position_in_frame};
use crate::scroll::{can_scroll_droppable, can_scroll_window};

/// What the fluid scroller needs to know about the drag in progress.
#[derive(Copy, Clone, Debug)]
pub struct FluidScrollState<'a> {
    /// Current page border-box center of the dragged item.
    pub page_border_box_center: Point,
    /// The dragged item.
    pub draggable: &'a DraggableId,
    /// Snapshot of every collected dimension.
    pub dimensions: &'a DimensionMap,
    /// Current viewport.
    pub viewport: &'a Viewport,
    /// The droppable the current impact lands in, if any.
    pub destination: Option<&'a DroppableId>,
    /// Whether the window may be scrolled.
    pub is_window_scroll_allowed: bool,
}

/// A scroll the fluid scroller decided on.
#[derive(Clone, Debug, PartialEq)]
pub enum FluidScrollChange {
    /// Scroll the window by this much.
    Window(Vec2),
    /// Scroll a droppable's frame by this much.
    Droppable(DroppableId, Vec2),
}

#[derive(Copy, Clone, Debug)]
struct Thresholds {
    start_scrolling_from: f64,
    max_speed_at: f64,
}

fn thresholds(container: Rect, axis: Axis, config: &AutoScrollConfig) -> Thresholds {
    let size = axis.size(container);
    Thresholds {
        start_scrolling_from: size * config.start_scrolling_from,
        max_speed_at: size * config.max_speed_at,
    }
}

fn percentage(start: f64, end: f64, current: f64) -> f64 {
    let range = end - start;
    if range == 0.0 {
        0.0
    } else {
        (current - start) / range
    }
}

fn speed_from_distance(distance: f64, thresholds: Thresholds, config: &AutoScrollConfig) -> f64 {
    if distance > thresholds.start_scrolling_from {
        return 0.0;
    }
    if distance <= thresholds.max_speed_at {
        return config.max_pixel_scroll;
    }
    if distance == thresholds.start_scrolling_from {
        return config.min_scroll;
    }
    let from_max = percentage(
        thresholds.max_speed_at,
        thresholds.start_scrolling_from,
        distance,
    );
    (config.max_pixel_scroll * AutoScrollConfig::ease(1.0 - from_max)).ceil()
}

fn dampen_by_time(proposed: f64, elapsed_ms: u64, config: &AutoScrollConfig) -> f64 {
    let dampening = config.dampening;
    if elapsed_ms >= dampening.stop_dampening_at_ms {
        return proposed;
    }
    if elapsed_ms < dampening.accelerate_at_ms {
        return config.min_scroll;
    }
    let through = percentage(
        dampening.accelerate_at_ms as f64,
        dampening.stop_dampening_at_ms as f64,
        elapsed_ms as f64,
    );
    (proposed * AutoScrollConfig::ease(through)).ceil()
}

fn speed(
    distance: f64,
    thresholds: Thresholds,
    config: &AutoScrollConfig,
    elapsed_ms: Option<u64>,
) -> f64 {
    let speed = speed_from_distance(distance, thresholds, config);
    if speed == 0.0 {
        return 0.0;
    }
    match elapsed_ms {
        None => speed,
        Some(elapsed) => dampen_by_time(speed, elapsed, config).max(config.min_scroll),
    }
}

fn scroll_on_axis(
    container: Rect,
    center: Point,
    axis: Axis,
    config: &AutoScrollConfig,
    elapsed_ms: Option<u64>,
) -> f64 {
    let thresholds = thresholds(container, axis, config);
    let to_start = axis.line(center) - axis.start(container);
    let to_end = axis.end(container) - axis.line(center);
    if to_end < to_start {
        speed(to_end, thresholds, config, elapsed_ms)
    } else {
        let speed = speed(to_start, thresholds, config, elapsed_ms);
        if speed == 0.0 { 0.0 } else { -speed }
    }
}

/// The scroll `container` should perform for a dragged `subject` centered at
/// `center`, or `None` when it should stay put.
///
/// A subject bigger than the container on an axis never scrolls on that axis.
fn get_scroll(
    container: Rect,
    subject: Rect,
    center: Point,
    config: &AutoScrollConfig,
    elapsed_ms: Option<u64>,
) -> Option<Vec2> {
    let required = Vec2::new(
        scroll_on_axis(container, center, Axis::Horizontal, config, elapsed_ms),
        scroll_on_axis(container, center, Axis::Vertical, config, elapsed_ms),
    );
    if required == Vec2::ZERO {
        return None;
    }

    let too_wide = subject.width() > container.width();
    let too_tall = subject.height() > container.height();
    let limited = Vec2::new(
        if too_wide { 0.0 } else { required.x },
        if too_tall { 0.0 } else { required.y },
    );
    (limited != Vec2::ZERO).then_some(limited)
}

/// The scrollable droppable the fluid scroller should consider.
///
/// When the drag is over a destination, only that droppable is considered.
/// Otherwise the first scrollable droppable (by id) whose frame contains the
/// center is used.
fn best_scrollable_droppable<'a>(
    center: Point,
    destination: Option<&DroppableId>,
    dimensions: &'a DimensionMap,
) -> Option<&'a DroppableDimension> {
    if let Some(destination) = destination {
        return dimensions
            .droppables
            .get(destination)
            .filter(|droppable| droppable.frame.is_some());
    }
    let mut candidates: Vec<_> = dimensions
        .droppables
        .values()
        .filter(|droppable| {
            droppable
                .frame
                .as_ref()
                .is_some_and(|frame| is_position_in_frame(frame.page_margin_box, center))
        })
        .collect();
    candidates.sort_by(|a, b| a.id().cmp(b.id()));
    candidates.into_iter().next()
}

/// Decide on a fluid scroll for the current drag state.
///
/// `elapsed_ms` is the time since the drag started when time dampening is in
/// effect, and `None` otherwise. The window is preferred when it is allowed to
/// scroll and can absorb the change; otherwise the best scrollable droppable is
/// tried.
pub fn fluid_scroll_change(
    state: &FluidScrollState<'_>,
    config: &AutoScrollConfig,
    elapsed_ms: Option<u64>,
) -> Option<FluidScrollChange> {
    let draggable = state.dimensions.draggables.get(state.draggable)?;
    let subject = draggable.page.margin_box;
    let center = state.page_border_box_center;

    if state.is_window_scroll_allowed {
        let change = get_scroll(state.viewport.frame, subject, center, config, elapsed_ms)
            .filter(|change| can_scroll_window(state.viewport, *change));
        if let Some(change) = change {
            return Some(FluidScrollChange::Window(change));
        }
    }

    let droppable = best_scrollable_droppable(center, state.destination, state.dimensions)?;
    let frame = droppable.frame.as_ref()?;
    let change = get_scroll(frame.page_margin_box, subject, center, config, elapsed_ms)?;
    can_scroll_droppable(droppable, change)
        .then(|| FluidScrollChange::Droppable(droppable.id().clone(), change))
}

#[derive(Copy, Clone, Debug)]
struct Dragging {
    started_at_ms: u64,
    use_dampening: bool,
}

/// Continuous, proximity-driven auto-scroll.
///
/// Both scroll callbacks run at most once per frame with the latest change.
pub struct FluidScroller {
    config: AutoScrollConfig,
    scroll_window: FrameThrottle<Vec2>,
    scroll_droppable: FrameThrottle<(DroppableId, Vec2)>,
    dragging: Option<Dragging>,
}

impl fmt::Debug for FluidScroller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluidScroller")
            .field("config", &self.config)
            .field("dragging", &self.dragging)
            .finish_non_exhaustive()
    }
}

impl FluidScroller {
    /// Create a scroller that delivers scrolls through `scheduler`.
    pub fn new(
        scheduler: Rc<dyn FrameScheduler>,
        config: AutoScrollConfig,
        scroll_window: impl FnMut(Vec2) + 'static,
        mut scroll_droppable: impl FnMut(DroppableId, Vec2) + 'static,
    ) -> Self {
        let scroll_droppable =
            move |(id, change): (DroppableId, Vec2)| scroll_droppable(id, change);
        Self {
            config,
            scroll_window: FrameThrottle::new(scheduler.clone(), scroll_window),
            scroll_droppable: FrameThrottle::new(scheduler, scroll_droppable),
            dragging: None,
        }
    }

    /// The tuning in use.
    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Begin a drag at `now_ms`.
    ///
    /// If the drag starts where scrolling would already happen, time dampening
    /// is enabled for the rest of the drag so the content does not race away
    /// the moment the item is lifted.
    pub fn start(&mut self, state: &FluidScrollState<'_>, now_ms: u64) {
        if self.dragging.is_some() {
            self.stop();
        }
        let use_dampening = fluid_scroll_change(state, &self.config, None).is_some();
        tracing::debug!(
            target: "understory_dnd::auto_scroll",
            use_dampening,
            "fluid scroll started"
        );
        self.dragging = Some(Dragging {
            started_at_ms: now_ms,
            use_dampening,
        });
        if use_dampening {
            self.scroll(state, now_ms);
        }
    }

    /// Schedule a scroll for the current drag state, if one is needed.
    ///
    /// Returns the change that was scheduled. Does nothing before [`start`](Self::start).
    pub fn scroll(&self, state: &FluidScrollState<'_>, now_ms: u64) -> Option<FluidScrollChange> {
        let dragging = self.dragging?;
        let elapsed = dragging
            .use_dampening
            .then(|| now_ms.saturating_sub(dragging.started_at_ms));
        let change = fluid_scroll_change(state, &self.config, elapsed)?;
        match &change {
            FluidScrollChange::Window(delta) => {
                tracing::trace!(
                    target: "understory_dnd::auto_scroll",
                    x = delta.x,
                    y = delta.y,
                    "scheduling window scroll"
                );
                self.scroll_window.schedule(*delta);
            }
            FluidScrollChange::Droppable(id, delta) => {
                tracing::trace!(
                    target: "understory_dnd::auto_scroll",
                    droppable = %id,
                    x = delta.x,
                    y = delta.y,
                    "scheduling droppable scroll"
                );
                self.scroll_droppable.schedule((id.clone(), *delta));
            }
        }
        Some(change)
    }

    /// End the drag and drop any scroll waiting for the next frame.
    ///
    /// Safe to call when no drag is in progress.
    pub fn stop(&mut self) {
        self.scroll_window.cancel();
        self.scroll_droppable.cancel();
        self.dragging = None;
    }
}

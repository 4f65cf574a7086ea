// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard-style index moves.
//!
//! Instead of hit testing a pointer, a keyboard move steps the dragged item one
//! slot forward or backward in the list it is over. The previous impact is
//! edited incrementally: one displacement is added or removed at the front.
//!
//! When the new slot is not fully on screen the dragged item stays where it is
//! and the move comes back with a scroll jump request, which the host passes to
//! [`jump_scroll`](crate::auto_scroll::jump_scroll).

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::dimension::{
    DimensionMap, DraggableDimension, DraggableId, DraggableLocation, DroppableDimension,
    DroppableId, Viewport,
};
use crate::geometry::Axis;
use crate::impact::{Displacement, DragImpact, DragMovement};

/// Inputs for [`move_to_next_index`].
#[derive(Copy, Clone, Debug)]
pub struct MoveInput<'a> {
    /// Step towards the end of the list.
    pub is_moving_forward: bool,
    /// The dragged item.
    pub draggable: &'a DraggableId,
    /// Where the dragged item's border-box center currently is, in page space.
    pub previous_page_border_box_center: Point,
    /// The impact the move starts from; its destination is the current slot.
    pub previous_impact: &'a DragImpact,
    /// The droppable the dragged item is over.
    pub droppable_id: &'a DroppableId,
    /// Snapshot of every collected dimension.
    pub dimensions: &'a DimensionMap,
    /// Current viewport.
    pub viewport: &'a Viewport,
}

/// Outcome of a keyboard move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveResult {
    /// Where the dragged item's border-box center should be drawn.
    pub page_border_box_center: Point,
    /// The impact at the new slot.
    pub impact: DragImpact,
    /// Distance still to travel by scrolling, when the new slot is off screen.
    pub scroll_jump_request: Option<Vec2>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

/// Center of `source` after aligning its `source_edge` with `destination`'s
/// `destination_edge` on `axis`, centered on `destination` across it.
fn move_to_edge(
    source: Rect,
    source_edge: Edge,
    destination: Rect,
    destination_edge: Edge,
    axis: Axis,
) -> Point {
    let target = match destination_edge {
        Edge::Start => axis.start(destination),
        Edge::End => axis.end(destination),
    };
    let half = axis.size(source) / 2.0;
    let line = match source_edge {
        Edge::Start => target + half,
        Edge::End => target - half,
    };
    axis.patch_point(line, axis.cross().center(destination))
}

/// Whether `border_box` is on screen: its full extent along `axis` lies inside
/// the droppable's clipping frame, if it has one, and inside the viewport.
/// Across the axis only its center has to be visible.
fn is_on_screen(
    border_box: Rect,
    axis: Axis,
    droppable: &DroppableDimension,
    viewport: &Viewport,
) -> bool {
    let fits = |frame: Rect| {
        let cross = axis.cross().center(border_box);
        axis.start(frame) <= axis.start(border_box)
            && axis.end(border_box) <= axis.end(frame)
            && axis.cross_start(frame) <= cross
            && cross <= axis.cross_end(frame)
    };
    let in_frame = droppable
        .frame
        .as_ref()
        .filter(|frame| frame.should_clip_subject)
        .is_none_or(|frame| fits(frame.page_margin_box));
    in_frame && fits(viewport.frame)
}

fn forced(id: &DraggableId) -> Displacement {
    Displacement {
        draggable_id: id.clone(),
        is_visible: true,
        should_animate: true,
    }
}

fn with_first_added(displaced: &[Displacement], id: &DraggableId) -> Vec<Displacement> {
    let mut out = Vec::with_capacity(displaced.len() + 1);
    out.push(forced(id));
    out.extend(displaced.iter().cloned());
    out
}

fn with_first_removed(displaced: &[Displacement]) -> Vec<Displacement> {
    displaced.iter().skip(1).cloned().collect()
}

struct Step {
    center: Point,
    index: usize,
    displaced: Vec<Displacement>,
    is_beyond_start_position: bool,
}

fn in_home_list(
    input: &MoveInput<'_>,
    draggable: &DraggableDimension,
    droppable: &DroppableDimension,
    current: usize,
) -> Option<Step> {
    let inside = input.dimensions.draggables_inside(droppable.id());
    let start = draggable.descriptor.index;
    let proposed = if input.is_moving_forward {
        current.checked_add(1)?
    } else {
        current.checked_sub(1)?
    };
    let target = inside.get(proposed)?;

    let is_moving_toward_start = if input.is_moving_forward {
        proposed <= start
    } else {
        proposed >= start
    };
    let edge = match (is_moving_toward_start, input.is_moving_forward) {
        (false, true) | (true, false) => Edge::End,
        (false, false) | (true, true) => Edge::Start,
    };
    let center = move_to_edge(
        draggable.page.border_box,
        edge,
        target.page.border_box,
        edge,
        droppable.axis,
    );

    let previous = &input.previous_impact.movement.displaced;
    let displaced = if is_moving_toward_start {
        with_first_removed(previous)
    } else {
        with_first_added(previous, &target.descriptor.id)
    };

    Some(Step {
        center,
        index: proposed,
        displaced,
        is_beyond_start_position: proposed > start,
    })
}

fn in_foreign_list(
    input: &MoveInput<'_>,
    draggable: &DraggableDimension,
    droppable: &DroppableDimension,
    current: usize,
) -> Option<Step> {
    let inside: Vec<_> = input
        .dimensions
        .draggables_inside(droppable.id())
        .into_iter()
        .filter(|d| d.descriptor.id != draggable.descriptor.id)
        .collect();
    let proposed = if input.is_moving_forward {
        current.checked_add(1)?
    } else {
        current.checked_sub(1)?
    };
    if proposed > inside.len() {
        return None;
    }
    let last = inside.len().checked_sub(1)?;
    let relative_to = inside[proposed.min(last)];
    let destination_edge = if proposed > last {
        Edge::End
    } else {
        Edge::Start
    };
    let center = move_to_edge(
        draggable.page.border_box,
        Edge::Start,
        relative_to.page.margin_box,
        destination_edge,
        droppable.axis,
    );

    let previous = &input.previous_impact.movement.displaced;
    let displaced = if input.is_moving_forward {
        with_first_removed(previous)
    } else {
        with_first_added(previous, &relative_to.descriptor.id)
    };

    Some(Step {
        center,
        index: proposed,
        displaced,
        is_beyond_start_position: false,
    })
}

/// Step the dragged item one slot forward or backward.
///
/// Returns `None` when the move is impossible: the item or droppable is
/// unknown, the previous impact is not over `droppable_id`, or the step would
/// leave the list.
pub fn move_to_next_index(input: MoveInput<'_>) -> Option<MoveResult> {
    let draggable = input.dimensions.draggables.get(input.draggable)?;
    let droppable = input.dimensions.droppables.get(input.droppable_id)?;
    let location = input.previous_impact.destination.as_ref()?;
    if &location.droppable_id != input.droppable_id {
        return None;
    }

    let is_home = draggable.descriptor.droppable_id == *input.droppable_id;
    let step = if is_home {
        in_home_list(&input, draggable, droppable, location.index)?
    } else {
        in_foreign_list(&input, draggable, droppable, location.index)?
    };

    let axis = droppable.axis;
    let impact = DragImpact {
        movement: DragMovement {
            displaced: step.displaced,
            amount: axis.patch(axis.size(draggable.page.margin_box), 0.0),
            is_beyond_start_position: step.is_beyond_start_position,
        },
        direction: Some(axis),
        destination: Some(DraggableLocation {
            droppable_id: input.droppable_id.clone(),
            index: step.index,
        }),
    };

    // Where the new slot is drawn once the droppable's own scroll is applied.
    let displacement = droppable.scroll_displacement();
    let drawn = step.center + displacement;
    let drawn_box = Rect::from_center_size(drawn, draggable.page.border_box.size());
    if is_on_screen(drawn_box, axis, droppable, input.viewport) {
        return Some(MoveResult {
            page_border_box_center: drawn,
            impact,
            scroll_jump_request: None,
        });
    }

    Some(MoveResult {
        page_border_box_center: input.previous_page_border_box_center,
        impact,
        scroll_jump_request: Some(drawn - input.previous_page_border_box_center),
    })
}

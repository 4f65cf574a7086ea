// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::displacement::get_displaced;
use super::{DragImpact, DragMovement, ListContext};
use crate::dimension::{DraggableDimension, DraggableLocation};

/// Impact when the dragged item is over its own list.
///
/// Moving forward displaces later siblings whose midpoint the dragged item's
/// leading edge has passed; moving backward does the same for earlier
/// siblings and the trailing edge.
pub(super) fn in_home_list(context: &ListContext<'_>) -> DragImpact {
    let axis = context.axis();
    let draggable = context.draggable;
    let origin = draggable.descriptor.index;
    let half = context.dragged_size() / 2.0;

    let original_center = axis.line(draggable.page.border_box.center());
    let current_center = axis.line(context.center);
    let is_moving_forward = current_center > original_center;

    let siblings = context
        .inside
        .iter()
        .copied()
        .filter(|child| child.descriptor.id != draggable.descriptor.id);

    let mut displaced: Vec<&DraggableDimension> = if is_moving_forward {
        let leading_edge = current_center + half;
        siblings
            .filter(|child| child.descriptor.index > origin)
            .filter(|child| leading_edge > axis.center(child.page.margin_box))
            .collect()
    } else {
        let trailing_edge = current_center - half;
        siblings
            .filter(|child| child.descriptor.index < origin)
            .filter(|child| trailing_edge < axis.center(child.page.margin_box))
            .collect()
    };

    // Nearest to the insertion point first.
    if is_moving_forward {
        displaced.reverse();
    }

    let index = if is_moving_forward {
        origin + displaced.len()
    } else {
        origin.saturating_sub(displaced.len())
    };

    DragImpact {
        movement: DragMovement {
            displaced: get_displaced(context, &displaced),
            amount: context.amount(),
            is_beyond_start_position: index > origin,
        },
        direction: Some(axis),
        destination: Some(DraggableLocation {
            droppable_id: context.destination.descriptor.id.clone(),
            index,
        }),
    }
}

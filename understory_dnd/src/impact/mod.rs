// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag impact: where the dragged item would land and who moves out of the way.
//!
//! [`compute_impact`] is a pure, total function. Given the dragged item's
//! current page border-box center, the dimension snapshot, the viewport and
//! the previous impact, it returns a fresh [`DragImpact`]. Calling it twice
//! with identical inputs returns identical values.
//!
//! The previous impact is only consulted for animation continuity: an item
//! that was already displaced keeps its `should_animate` flag.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::dimension::{
    DimensionMap, DraggableDimension, DraggableId, DraggableLocation, DroppableDimension, Viewport,
};
use crate::geometry::Axis;

mod displacement;
mod foreign;
mod home;
mod over;

pub use over::get_droppable_over;

/// One item pushed out of the way of the dragged item.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Displacement {
    /// The displaced item.
    pub draggable_id: DraggableId,
    /// Whether the user can see the item (or is forced to see it).
    pub is_visible: bool,
    /// Whether the move should be animated rather than applied instantly.
    pub should_animate: bool,
}

/// How the displaced items move.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragMovement {
    /// Displaced items, nearest to the insertion point first.
    pub displaced: Vec<Displacement>,
    /// The dragged item's margin-box size along the destination axis, as a vector on that axis.
    pub amount: Vec2,
    /// Whether the dragged item sits after its original slot in its home list.
    pub is_beyond_start_position: bool,
}

/// Result of an impact computation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragImpact {
    /// Displacement of other items.
    pub movement: DragMovement,
    /// Axis of the destination list.
    pub direction: Option<Axis>,
    /// Where the dragged item would land.
    pub destination: Option<DraggableLocation>,
}

impl DragImpact {
    /// The "no impact" value: no destination, nothing displaced.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `id` is displaced by this impact.
    pub fn is_displaced(&self, id: &DraggableId) -> bool {
        self.movement
            .displaced
            .iter()
            .any(|d| &d.draggable_id == id)
    }
}

/// Inputs for [`compute_impact`].
#[derive(Copy, Clone, Debug)]
pub struct ImpactInput<'a> {
    /// Current page border-box center of the dragged item.
    pub page_border_box_center: Point,
    /// The dragged item.
    pub draggable: &'a DraggableId,
    /// Snapshot of every collected dimension.
    pub dimensions: &'a DimensionMap,
    /// Impact from the previous move.
    pub previous_impact: &'a DragImpact,
    /// Current viewport.
    pub viewport: &'a Viewport,
}

/// Arguments shared by the home and foreign list computations.
pub(crate) struct ListContext<'a> {
    pub(crate) center: Point,
    pub(crate) draggable: &'a DraggableDimension,
    pub(crate) destination: &'a DroppableDimension,
    pub(crate) inside: Vec<&'a DraggableDimension>,
    pub(crate) previous_impact: &'a DragImpact,
    pub(crate) viewport: &'a Viewport,
}

impl ListContext<'_> {
    pub(crate) fn axis(&self) -> Axis {
        self.destination.axis
    }

    /// Size of the dragged item's margin box along the destination axis.
    pub(crate) fn dragged_size(&self) -> f64 {
        self.axis().size(self.draggable.page.margin_box)
    }

    pub(crate) fn amount(&self) -> Vec2 {
        self.axis().patch(self.dragged_size(), 0.0)
    }
}

/// Compute where the dragged item would land for the given center.
///
/// Returns [`DragImpact::none`] when the dragged item or its home is unknown,
/// when the center is over no droppable, or when the droppable under it is
/// disabled or of another type.
pub fn compute_impact(input: ImpactInput<'_>) -> DragImpact {
    let dimensions = input.dimensions;
    let Some(draggable) = dimensions.draggables.get(input.draggable) else {
        return DragImpact::none();
    };
    let Some(home) = dimensions
        .droppables
        .get(&draggable.descriptor.droppable_id)
    else {
        return DragImpact::none();
    };
    let Some(destination) = get_droppable_over(
        input.page_border_box_center,
        dimensions.droppables.values(),
        input.viewport,
    ) else {
        return DragImpact::none();
    };
    if !destination.is_enabled || destination.descriptor.kind != home.descriptor.kind {
        return DragImpact::none();
    }

    // Captured geometry is pre-scroll; move the center into the same space.
    let center = input.page_border_box_center + destination.scroll_diff();
    let inside = dimensions.draggables_inside(destination.id());
    let context = ListContext {
        center,
        draggable,
        destination,
        inside,
        previous_impact: input.previous_impact,
        viewport: input.viewport,
    };

    if destination.id() == home.id() {
        home::in_home_list(&context)
    } else {
        foreign::in_foreign_list(&context)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use alloc::format;
    use alloc::vec::Vec;

    use kurbo::{Point, Rect, Size, Vec2};

    use crate::dimension::{
        ClosestScrollable, DimensionMap, DraggableDescriptor, DraggableDimension, DraggableId,
        DroppableConfig, DroppableDescriptor, DroppableDimension, DroppableType, Viewport,
    };
    use crate::geometry::{Axis, BoxModel};

    /// A vertical list at `x0..x0+100` holding `count` contiguous items of `size`.
    pub(crate) fn vertical_list(
        map: &mut DimensionMap,
        id: &str,
        x0: f64,
        count: usize,
        size: f64,
    ) -> Vec<DraggableId> {
        list(map, id, Axis::Vertical, x0, count, size, None)
    }

    pub(crate) fn list(
        map: &mut DimensionMap,
        id: &str,
        axis: Axis,
        offset: f64,
        count: usize,
        size: f64,
        closest: Option<ClosestScrollable>,
    ) -> Vec<DraggableId> {
        let extent = (count.max(1) as f64) * size;
        let rect_for = |start: f64, end: f64| match axis {
            Axis::Vertical => Rect::new(offset, start, offset + 100.0, end),
            Axis::Horizontal => Rect::new(start, offset, end, offset + 100.0),
        };
        map.insert_droppable(DroppableDimension::new(
            DroppableDescriptor {
                id: id.into(),
                kind: DroppableType::default(),
            },
            &DroppableConfig {
                direction: axis,
                ..DroppableConfig::default()
            },
            BoxModel::from_border_box(rect_for(0.0, extent)),
            Vec2::ZERO,
            closest,
        ));
        (0..count)
            .map(|index| {
                let start = index as f64 * size;
                let item = DraggableId::from(format!("{id}-{index}"));
                map.insert_draggable(DraggableDimension::new(
                    DraggableDescriptor {
                        id: item.clone(),
                        droppable_id: id.into(),
                        index,
                    },
                    BoxModel::from_border_box(rect_for(start, start + size)),
                    Vec2::ZERO,
                ));
                item
            })
            .collect()
    }

    pub(crate) fn viewport() -> Viewport {
        Viewport::new(Size::new(1000.0, 1000.0), Vec2::ZERO, Vec2::ZERO)
    }

    pub(crate) fn point_on(axis: Axis, line: f64, cross: f64) -> Point {
        axis.patch_point(line, cross)
    }
}

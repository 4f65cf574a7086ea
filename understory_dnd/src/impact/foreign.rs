// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::displacement::get_displaced;
use super::{DragImpact, DragMovement, ListContext};
use crate::dimension::{DraggableDimension, DraggableLocation};

/// Impact when the dragged item is over a list other than its own.
///
/// Everything whose midpoint lies after the dragged item's trailing edge moves
/// forward to make room; the dragged item lands in front of them.
pub(super) fn in_foreign_list(context: &ListContext<'_>) -> DragImpact {
    let axis = context.axis();
    let trailing_edge = axis.line(context.center) - context.dragged_size() / 2.0;

    let displaced: Vec<&DraggableDimension> = context
        .inside
        .iter()
        .copied()
        .filter(|child| child.descriptor.id != context.draggable.descriptor.id)
        .filter(|child| axis.center(child.page.margin_box) > trailing_edge)
        .collect();

    let index = context.inside.len() - displaced.len();

    DragImpact {
        movement: DragMovement {
            displaced: get_displaced(context, &displaced),
            amount: context.amount(),
            is_beyond_start_position: false,
        },
        direction: Some(axis),
        destination: Some(DraggableLocation {
            droppable_id: context.destination.descriptor.id.clone(),
            index,
        }),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Point, Rect, Size, Vec2};

    use crate::dimension::{
        ClosestScrollable, DimensionMap, DroppableConfig, DroppableDescriptor, DroppableDimension,
        DroppableId, DroppableType,
    };
    use crate::geometry::{Axis, BoxModel};
    use crate::impact::test_support::{list, vertical_list, viewport};
    use crate::impact::{DragImpact, ImpactInput, compute_impact};

    fn displaced_ids(impact: &DragImpact) -> Vec<&str> {
        impact
            .movement
            .displaced
            .iter()
            .map(|d| d.draggable_id.as_str())
            .collect()
    }

    #[test]
    fn empty_foreign_list_accepts_at_zero() {
        let mut map = DimensionMap::new();
        let items = vertical_list(&mut map, "home", 0.0, 2, 50.0);
        vertical_list(&mut map, "empty", 200.0, 0, 50.0);
        let impact = compute_impact(ImpactInput {
            page_border_box_center: Point::new(250.0, 25.0),
            draggable: &items[0],
            dimensions: &map,
            previous_impact: &DragImpact::none(),
            viewport: &viewport(),
        });
        let destination = impact.destination.unwrap();
        assert_eq!(destination.droppable_id, DroppableId::from("empty"));
        assert_eq!(destination.index, 0);
        assert!(impact.movement.displaced.is_empty());
    }

    #[test]
    fn collapsed_empty_list_accepts_at_zero() {
        let mut map = DimensionMap::new();
        let items = vertical_list(&mut map, "home", 0.0, 2, 50.0);
        map.insert_droppable(DroppableDimension::new(
            DroppableDescriptor {
                id: "collapsed".into(),
                kind: DroppableType::default(),
            },
            &DroppableConfig::default(),
            BoxModel::from_border_box(Rect::new(200.0, 0.0, 300.0, 0.0)),
            Vec2::ZERO,
            None,
        ));
        let impact = compute_impact(ImpactInput {
            page_border_box_center: Point::new(250.0, 0.0),
            draggable: &items[0],
            dimensions: &map,
            previous_impact: &DragImpact::none(),
            viewport: &viewport(),
        });
        let destination = impact.destination.unwrap();
        assert_eq!(destination.droppable_id, DroppableId::from("collapsed"));
        assert_eq!(destination.index, 0);
    }

    #[test]
    fn items_after_the_trailing_edge_are_displaced_in_order() {
        let mut map = DimensionMap::new();
        let items = vertical_list(&mut map, "home", 0.0, 2, 50.0);
        vertical_list(&mut map, "other", 200.0, 3, 50.0);
        // Trailing edge at 35: item 0's midpoint (25) stays, the rest move.
        let impact = compute_impact(ImpactInput {
            page_border_box_center: Point::new(250.0, 60.0),
            draggable: &items[0],
            dimensions: &map,
            previous_impact: &DragImpact::none(),
            viewport: &viewport(),
        });
        assert_eq!(impact.destination.as_ref().map(|d| d.index), Some(1));
        assert_eq!(displaced_ids(&impact), ["other-1", "other-2"]);
        assert!(!impact.movement.is_beyond_start_position);
    }

    #[test]
    fn scrolled_destination_uses_current_geometry() {
        let mut map = DimensionMap::new();
        let items = vertical_list(&mut map, "home", 0.0, 1, 50.0);
        list(
            &mut map,
            "scroller",
            Axis::Vertical,
            200.0,
            10,
            50.0,
            Some(ClosestScrollable {
                client: BoxModel::from_border_box(Rect::new(200.0, 0.0, 300.0, 200.0)),
                scroll_size: Size::new(100.0, 500.0),
                scroll: Vec2::ZERO,
            }),
        );
        let id = DroppableId::from("scroller");
        let scrolled = map.droppables[&id].scrolled(Vec2::new(0.0, 100.0));
        map.insert_droppable(scrolled);

        // On screen at y=60, which is y=160 in captured content space.
        let input = ImpactInput {
            page_border_box_center: Point::new(250.0, 60.0),
            draggable: &items[0],
            dimensions: &map,
            previous_impact: &DragImpact::none(),
            viewport: &viewport(),
        };
        let first = compute_impact(input);
        assert_eq!(first.destination.as_ref().map(|d| d.index), Some(3));
        assert_eq!(first, compute_impact(input));
    }
}

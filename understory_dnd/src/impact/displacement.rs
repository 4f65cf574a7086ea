// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::{Displacement, DragImpact, ListContext};
use crate::dimension::{DraggableDimension, DraggableId, DroppableDimension, Viewport};
use crate::visibility::is_partially_visible;

/// `should_animate` of `id` in `previous`, if it was displaced there.
pub(crate) fn previous_should_animate(previous: &DragImpact, id: &DraggableId) -> Option<bool> {
    previous
        .movement
        .displaced
        .iter()
        .find(|d| &d.draggable_id == id)
        .map(|d| d.should_animate)
}

/// Displacement record for one item.
///
/// Invisible items never animate. Visible items keep whatever they had in the
/// previous impact, and animate when newly displaced.
pub(crate) fn displacement_for(
    item: &DraggableDimension,
    destination: &DroppableDimension,
    viewport: &Viewport,
    previous: &DragImpact,
    forced_visible: bool,
) -> Displacement {
    let is_visible = forced_visible
        || is_partially_visible(item.page.margin_box, destination, viewport, true);
    let should_animate = is_visible
        && previous_should_animate(previous, &item.descriptor.id).unwrap_or(true);
    Displacement {
        draggable_id: item.descriptor.id.clone(),
        is_visible,
        should_animate,
    }
}

/// Turn ordered displaced items into displacement records.
///
/// `ordered` must already be nearest-to-insertion-point first. Walking it in
/// that order, every item whose cumulative size (itself included) stays within
/// the dragged item's size is forced visible.
pub(crate) fn get_displaced(
    context: &ListContext<'_>,
    ordered: &[&DraggableDimension],
) -> Vec<Displacement> {
    let axis = context.axis();
    let budget = context.dragged_size();
    let mut distance = 0.0;
    ordered
        .iter()
        .map(|item| {
            distance += axis.size(item.page.margin_box);
            displacement_for(
                item,
                context.destination,
                context.viewport,
                context.previous_impact,
                distance <= budget,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Rect, Size, Vec2};

    use super::{displacement_for, get_displaced};
    use crate::dimension::{ClosestScrollable, DimensionMap, DraggableId, DroppableId, Viewport};
    use crate::geometry::{Axis, BoxModel};
    use crate::impact::test_support::list;
    use crate::impact::{Displacement, DragImpact, DragMovement, ListContext};

    /// A 100px scroll container over a list of ten 40px items.
    fn scrolled_list() -> (DimensionMap, Vec<DraggableId>) {
        let mut map = DimensionMap::new();
        let items = list(
            &mut map,
            "list",
            Axis::Vertical,
            0.0,
            10,
            40.0,
            Some(ClosestScrollable {
                client: BoxModel::from_border_box(Rect::new(0.0, 0.0, 100.0, 100.0)),
                scroll_size: Size::new(100.0, 400.0),
                scroll: Vec2::ZERO,
            }),
        );
        (map, items)
    }

    #[test]
    fn invisible_items_do_not_animate() {
        let (map, items) = scrolled_list();
        let droppable = &map.droppables[&DroppableId::from("list")];
        let viewport = Viewport::new(Size::new(800.0, 800.0), Vec2::ZERO, Vec2::ZERO);
        let hidden = &map.draggables[&items[5]];
        let d = displacement_for(hidden, droppable, &viewport, &DragImpact::none(), false);
        assert!(!d.is_visible && !d.should_animate);
    }

    #[test]
    fn visible_items_keep_previous_animation_flag() {
        let (map, items) = scrolled_list();
        let droppable = &map.droppables[&DroppableId::from("list")];
        let viewport = Viewport::new(Size::new(800.0, 800.0), Vec2::ZERO, Vec2::ZERO);
        let previous = DragImpact {
            movement: DragMovement {
                displaced: vec![Displacement {
                    draggable_id: items[1].clone(),
                    is_visible: true,
                    should_animate: false,
                }],
                ..DragMovement::default()
            },
            ..DragImpact::default()
        };
        let shown = &map.draggables[&items[1]];
        let d = displacement_for(shown, droppable, &viewport, &previous, false);
        assert!(d.is_visible);
        assert!(!d.should_animate);
        let fresh = displacement_for(shown, droppable, &viewport, &DragImpact::none(), false);
        assert!(fresh.should_animate);
    }

    #[test]
    fn forced_visibility_covers_one_dragged_size() {
        let (map, items) = scrolled_list();
        let viewport = Viewport::new(Size::new(800.0, 800.0), Vec2::ZERO, Vec2::ZERO);
        let previous = DragImpact::none();
        // Item 0 is 40px; items 6..9 are all hidden by the container.
        let context = ListContext {
            center: Point::new(50.0, 20.0),
            draggable: &map.draggables[&items[0]],
            destination: &map.droppables[&DroppableId::from("list")],
            inside: Vec::new(),
            previous_impact: &previous,
            viewport: &viewport,
        };
        let ordered: Vec<_> = items[6..9].iter().map(|id| &map.draggables[id]).collect();
        let displaced = get_displaced(&context, &ordered);
        let visible: Vec<_> = displaced.iter().map(|d| d.is_visible).collect();
        assert_eq!(visible, [true, false, false]);
        assert!(displaced[0].should_animate);
    }
}

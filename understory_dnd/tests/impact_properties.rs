// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for drag impact over generated vertical lists.

use kurbo::{Point, Rect, Size, Vec2};
use proptest::prelude::*;
use understory_dnd::{
    BoxModel, DimensionMap, DragImpact, DraggableDescriptor, DraggableDimension, DraggableId,
    DroppableConfig, DroppableDescriptor, DroppableDimension, DroppableType, ImpactInput, Viewport,
    compute_impact,
};

/// A vertical list `id` at `x0..x0 + 100` with `count` items of height `size`.
fn insert_list(map: &mut DimensionMap, id: &str, x0: f64, count: usize, size: f64) {
    let extent = count.max(1) as f64 * size;
    map.insert_droppable(DroppableDimension::new(
        DroppableDescriptor {
            id: id.into(),
            kind: DroppableType::default(),
        },
        &DroppableConfig::default(),
        BoxModel::from_border_box(Rect::new(x0, 0.0, x0 + 100.0, extent)),
        Vec2::ZERO,
        None,
    ));
    for index in 0..count {
        let y = index as f64 * size;
        map.insert_draggable(DraggableDimension::new(
            DraggableDescriptor {
                id: format!("{id}-{index}").into(),
                droppable_id: id.into(),
                index,
            },
            BoxModel::from_border_box(Rect::new(x0, y, x0 + 100.0, y + size)),
            Vec2::ZERO,
        ));
    }
}

fn viewport() -> Viewport {
    Viewport::new(Size::new(1000.0, 1000.0), Vec2::ZERO, Vec2::ZERO)
}

fn impact_at(
    dimensions: &DimensionMap,
    draggable: &DraggableId,
    center: Point,
    previous: &DragImpact,
) -> DragImpact {
    compute_impact(ImpactInput {
        page_border_box_center: center,
        draggable,
        dimensions,
        previous_impact: previous,
        viewport: &viewport(),
    })
}

fn index_of(dimensions: &DimensionMap, id: &DraggableId) -> usize {
    dimensions.draggables[id].descriptor.index
}

/// `(count, size, dragged index, center y)` for a single list.
fn home_case() -> impl Strategy<Value = (usize, f64, usize, f64)> {
    (1_usize..=8, 10_i32..=60).prop_flat_map(|(count, size)| {
        let extent = count as i32 * size;
        (
            Just(count),
            Just(f64::from(size)),
            0..count,
            (0..=extent).prop_map(f64::from),
        )
    })
}

proptest! {
    #[test]
    fn impact_is_idempotent((count, size, dragged, y) in home_case()) {
        let mut dimensions = DimensionMap::new();
        insert_list(&mut dimensions, "list", 0.0, count, size);
        let id = DraggableId::from(format!("list-{dragged}"));
        let center = Point::new(50.0, y);

        let first = impact_at(&dimensions, &id, center, &DragImpact::none());
        let again = impact_at(&dimensions, &id, center, &DragImpact::none());
        prop_assert_eq!(&first, &again);

        let chained = impact_at(&dimensions, &id, center, &first);
        let chained_again = impact_at(&dimensions, &id, center, &first);
        prop_assert_eq!(&chained, &chained_again);
        prop_assert_eq!(chained.destination, first.destination);
    }

    #[test]
    fn home_displacement_is_a_contiguous_run((count, size, dragged, y) in home_case()) {
        let mut dimensions = DimensionMap::new();
        insert_list(&mut dimensions, "list", 0.0, count, size);
        let id = DraggableId::from(format!("list-{dragged}"));

        let impact = impact_at(&dimensions, &id, Point::new(50.0, y), &DragImpact::none());
        let destination = impact.destination.clone();
        prop_assert!(destination.is_some());
        let index = destination.map_or(0, |location| location.index);
        prop_assert!(index < count);

        let displaced: Vec<usize> = impact
            .movement
            .displaced
            .iter()
            .map(|d| index_of(&dimensions, &d.draggable_id))
            .collect();
        prop_assert!(!impact.is_displaced(&id));
        prop_assert_eq!(displaced.len(), index.abs_diff(dragged));
        prop_assert_eq!(impact.movement.is_beyond_start_position, index > dragged);

        // Closest to the dragged item's final slot first.
        let expected: Vec<usize> = if index > dragged {
            (dragged + 1..=index).rev().collect()
        } else {
            (index..dragged).collect()
        };
        prop_assert_eq!(displaced, expected);
    }

    #[test]
    fn foreign_displacement_is_the_tail(
        (count, size, _dragged, y) in home_case(),
        home_count in 1_usize..=4,
    ) {
        let mut dimensions = DimensionMap::new();
        insert_list(&mut dimensions, "home", 0.0, home_count, size);
        insert_list(&mut dimensions, "other", 200.0, count, size);
        let id = DraggableId::from("home-0");

        let impact = impact_at(&dimensions, &id, Point::new(250.0, y), &DragImpact::none());
        let destination = impact.destination.clone();
        prop_assert_eq!(
            destination.as_ref().map(|location| location.droppable_id.as_str()),
            Some("other")
        );
        let index = destination.map_or(0, |location| location.index);
        prop_assert!(index <= count);
        prop_assert!(!impact.movement.is_beyond_start_position);

        let mut displaced: Vec<usize> = impact
            .movement
            .displaced
            .iter()
            .map(|d| index_of(&dimensions, &d.draggable_id))
            .collect();
        displaced.sort_unstable();
        prop_assert_eq!(displaced, (index..count).collect::<Vec<_>>());
    }

    #[test]
    fn outside_every_droppable_is_no_impact(
        (count, size, dragged, y) in home_case(),
        x in prop_oneof![-400_i32..-1, 101_i32..600].prop_map(f64::from),
    ) {
        let mut dimensions = DimensionMap::new();
        insert_list(&mut dimensions, "list", 0.0, count, size);
        let id = DraggableId::from(format!("list-{dragged}"));
        let impact = impact_at(&dimensions, &id, Point::new(x, y), &DragImpact::none());
        prop_assert_eq!(impact, DragImpact::none());
    }
}

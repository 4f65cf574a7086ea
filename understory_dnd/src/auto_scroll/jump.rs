// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Vec2;

use crate::dimension::{DimensionMap, DroppableDimension, DroppableId, Viewport};
use crate::impact::DragImpact;
use crate::scroll::{
    can_scroll_droppable, can_scroll_window, get_droppable_overlap, get_window_overlap,
};

/// What the jump scroller needs to know about the drag in progress.
#[derive(Copy, Clone, Debug)]
pub struct JumpScrollState<'a> {
    /// The impact after the keyboard move; its destination is scrolled first.
    pub impact: &'a DragImpact,
    /// Snapshot of every collected dimension.
    pub dimensions: &'a DimensionMap,
    /// Current viewport.
    pub viewport: &'a Viewport,
    /// Whether the window may be scrolled.
    pub is_window_scroll_allowed: bool,
}

/// Side effects of a jump scroll, implemented by the host.
pub trait JumpScrollActions {
    /// Scroll a droppable's frame by `change`.
    fn scroll_droppable(&mut self, id: &DroppableId, change: Vec2);
    /// Scroll the window by `change`.
    fn scroll_window(&mut self, change: Vec2);
    /// Move the dragged item directly by `offset`.
    fn move_by(&mut self, offset: Vec2);
}

/// How a jump was split between the three tiers.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JumpScrollOutcome {
    /// Absorbed by the destination droppable's frame.
    pub droppable: Vec2,
    /// Absorbed by the window.
    pub window: Vec2,
    /// Applied as a direct move of the dragged item.
    pub moved_by: Vec2,
}

/// Scroll `droppable` by as much of `change` as it can take; returns what is left.
fn scroll_droppable_as_much_as_possible(
    droppable: &DroppableDimension,
    change: Vec2,
    actions: &mut impl JumpScrollActions,
) -> (Vec2, Option<Vec2>) {
    if !can_scroll_droppable(droppable, change) {
        return (Vec2::ZERO, Some(change));
    }
    let Some(overlap) = get_droppable_overlap(droppable, change) else {
        actions.scroll_droppable(droppable.id(), change);
        return (change, None);
    };
    let absorbed = change - overlap;
    actions.scroll_droppable(droppable.id(), absorbed);
    (absorbed, Some(overlap))
}

/// Scroll the window by as much of `change` as it can take; returns what is left.
fn scroll_window_as_much_as_possible(
    state: &JumpScrollState<'_>,
    change: Vec2,
    actions: &mut impl JumpScrollActions,
) -> (Vec2, Option<Vec2>) {
    if !state.is_window_scroll_allowed || !can_scroll_window(state.viewport, change) {
        return (Vec2::ZERO, Some(change));
    }
    let Some(overlap) = get_window_overlap(state.viewport, change) else {
        actions.scroll_window(change);
        return (change, None);
    };
    let absorbed = change - overlap;
    actions.scroll_window(absorbed);
    (absorbed, Some(overlap))
}

/// Distribute a keyboard move's `request` over the destination droppable, the
/// window, and finally a direct move of the dragged item.
///
/// Each tier absorbs what its scroll range allows and passes the rest on, so
/// the dragged item always ends up where the move asked for. Without a
/// destination the droppable tier is skipped.
pub fn jump_scroll(
    state: &JumpScrollState<'_>,
    request: Vec2,
    actions: &mut impl JumpScrollActions,
) -> JumpScrollOutcome {
    let mut outcome = JumpScrollOutcome::default();
    if request == Vec2::ZERO {
        return outcome;
    }

    let destination = state
        .impact
        .destination
        .as_ref()
        .and_then(|location| state.dimensions.droppables.get(&location.droppable_id));
    let remainder = match destination {
        Some(droppable) => {
            let (absorbed, remainder) =
                scroll_droppable_as_much_as_possible(droppable, request, actions);
            outcome.droppable = absorbed;
            remainder
        }
        None => Some(request),
    };
    let Some(remainder) = remainder else {
        return outcome;
    };

    let (absorbed, remainder) = scroll_window_as_much_as_possible(state, remainder, actions);
    outcome.window = absorbed;
    let Some(remainder) = remainder else {
        return outcome;
    };

    tracing::trace!(
        target: "understory_dnd::auto_scroll",
        x = remainder.x,
        y = remainder.y,
        "jump scroll could not absorb the move; moving directly"
    );
    actions.move_by(remainder);
    outcome.moved_by = remainder;
    outcome
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Rect, Size, Vec2};

    use super::{JumpScrollActions, JumpScrollOutcome, JumpScrollState, jump_scroll};
    use crate::dimension::{ClosestScrollable, DimensionMap, DraggableLocation, DroppableId, Viewport};
    use crate::geometry::{Axis, BoxModel};
    use crate::impact::DragImpact;
    use crate::impact::test_support::list;

    #[derive(Debug, PartialEq)]
    enum Action {
        Droppable(DroppableId, Vec2),
        Window(Vec2),
        Move(Vec2),
    }

    #[derive(Default)]
    struct Recorder(Vec<Action>);

    impl JumpScrollActions for Recorder {
        fn scroll_droppable(&mut self, id: &DroppableId, change: Vec2) {
            self.0.push(Action::Droppable(id.clone(), change));
        }
        fn scroll_window(&mut self, change: Vec2) {
            self.0.push(Action::Window(change));
        }
        fn move_by(&mut self, offset: Vec2) {
            self.0.push(Action::Move(offset));
        }
    }

    /// A list whose frame can scroll `droppable_room` further, in a window that
    /// can scroll `window_room` further.
    fn setup(droppable_room: f64, window_room: f64) -> (DimensionMap, Viewport, DragImpact) {
        let mut map = DimensionMap::new();
        list(
            &mut map,
            "list",
            Axis::Vertical,
            0.0,
            10,
            50.0,
            Some(ClosestScrollable {
                client: BoxModel::from_border_box(Rect::new(0.0, 0.0, 100.0, 200.0)),
                scroll_size: Size::new(100.0, 200.0 + droppable_room),
                scroll: Vec2::ZERO,
            }),
        );
        let viewport = Viewport::new(
            Size::new(800.0, 600.0),
            Vec2::ZERO,
            Vec2::new(0.0, window_room),
        );
        let impact = DragImpact {
            destination: Some(DraggableLocation {
                droppable_id: "list".into(),
                index: 3,
            }),
            ..DragImpact::default()
        };
        (map, viewport, impact)
    }

    #[test]
    fn distributes_over_three_tiers() {
        let (map, viewport, impact) = setup(30.0, 40.0);
        let state = JumpScrollState {
            impact: &impact,
            dimensions: &map,
            viewport: &viewport,
            is_window_scroll_allowed: true,
        };
        let mut recorder = Recorder::default();
        let outcome = jump_scroll(&state, Vec2::new(0.0, 100.0), &mut recorder);
        assert_eq!(
            outcome,
            JumpScrollOutcome {
                droppable: Vec2::new(0.0, 30.0),
                window: Vec2::new(0.0, 40.0),
                moved_by: Vec2::new(0.0, 30.0),
            }
        );
        assert_eq!(
            recorder.0,
            [
                Action::Droppable("list".into(), Vec2::new(0.0, 30.0)),
                Action::Window(Vec2::new(0.0, 40.0)),
                Action::Move(Vec2::new(0.0, 30.0)),
            ]
        );
    }

    #[test]
    fn droppable_absorbs_everything_it_can() {
        let (map, viewport, impact) = setup(500.0, 40.0);
        let state = JumpScrollState {
            impact: &impact,
            dimensions: &map,
            viewport: &viewport,
            is_window_scroll_allowed: true,
        };
        let mut recorder = Recorder::default();
        let outcome = jump_scroll(&state, Vec2::new(0.0, 100.0), &mut recorder);
        assert_eq!(outcome.droppable, Vec2::new(0.0, 100.0));
        assert_eq!(recorder.0, [Action::Droppable("list".into(), Vec2::new(0.0, 100.0))]);
    }

    #[test]
    fn disallowed_window_passes_straight_to_move() {
        let (map, viewport, impact) = setup(0.0, 400.0);
        let state = JumpScrollState {
            impact: &impact,
            dimensions: &map,
            viewport: &viewport,
            is_window_scroll_allowed: false,
        };
        let mut recorder = Recorder::default();
        let outcome = jump_scroll(&state, Vec2::new(0.0, -20.0), &mut recorder);
        assert_eq!(outcome.moved_by, Vec2::new(0.0, -20.0));
        assert_eq!(recorder.0, [Action::Move(Vec2::new(0.0, -20.0))]);
    }
}

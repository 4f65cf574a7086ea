// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility of a rectangle through a droppable's clipped frame and the viewport.
//!
//! Targets are page-space rectangles captured before any droppable scroll.
//! When `with_droppable_displacement` is set they are first moved by the
//! destination's scroll displacement, so a target is tested where it is drawn
//! now rather than where it was measured.

use kurbo::Rect;

use crate::dimension::{DroppableDimension, Viewport};

#[inline]
fn is_within(lower: f64, upper: f64, value: f64) -> bool {
    lower <= value && value <= upper
}

/// Whether any part of `subject` can be seen through `frame`.
///
/// A subject that is larger than the frame on one axis still counts as visible
/// when it overlaps the frame on the other axis.
pub fn is_partially_visible_through_frame(frame: Rect, subject: Rect) -> bool {
    let vertically =
        is_within(frame.y0, frame.y1, subject.y0) || is_within(frame.y0, frame.y1, subject.y1);
    let horizontally =
        is_within(frame.x0, frame.x1, subject.x0) || is_within(frame.x0, frame.x1, subject.x1);
    if vertically && horizontally {
        return true;
    }

    let bigger_vertically = subject.y0 < frame.y0 && subject.y1 > frame.y1;
    let bigger_horizontally = subject.x0 < frame.x0 && subject.x1 > frame.x1;
    if bigger_vertically && bigger_horizontally {
        return true;
    }
    (bigger_vertically && horizontally) || (bigger_horizontally && vertically)
}

/// Whether all of `subject` lies within `frame`, edges included.
pub fn is_totally_visible_through_frame(frame: Rect, subject: Rect) -> bool {
    is_within(frame.y0, frame.y1, subject.y0)
        && is_within(frame.y0, frame.y1, subject.y1)
        && is_within(frame.x0, frame.x1, subject.x0)
        && is_within(frame.x0, frame.x1, subject.x1)
}

fn is_visible(
    target: Rect,
    destination: &DroppableDimension,
    viewport: &Viewport,
    with_droppable_displacement: bool,
    through_frame: fn(Rect, Rect) -> bool,
) -> bool {
    let target = if with_droppable_displacement {
        target + destination.scroll_displacement()
    } else {
        target
    };
    // A droppable clipped away entirely shows nothing.
    let Some(active) = destination.subject.active else {
        return false;
    };
    through_frame(active, target) && through_frame(viewport.frame, target)
}

/// Whether `target` is at least partially visible in both the destination's
/// clipped frame and the viewport.
pub fn is_partially_visible(
    target: Rect,
    destination: &DroppableDimension,
    viewport: &Viewport,
    with_droppable_displacement: bool,
) -> bool {
    is_visible(
        target,
        destination,
        viewport,
        with_droppable_displacement,
        is_partially_visible_through_frame,
    )
}

/// Whether `target` is entirely visible in both the destination's clipped
/// frame and the viewport.
pub fn is_totally_visible(
    target: Rect,
    destination: &DroppableDimension,
    viewport: &Viewport,
    with_droppable_displacement: bool,
) -> bool {
    is_visible(
        target,
        destination,
        viewport,
        with_droppable_displacement,
        is_totally_visible_through_frame,
    )
}

/// Whether `target` is entirely visible in the viewport, ignoring droppables.
pub fn is_totally_visible_in_viewport(target: Rect, viewport: &Viewport) -> bool {
    is_totally_visible_through_frame(viewport.frame, target)
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size, Vec2};

    use super::{
        is_partially_visible, is_partially_visible_through_frame, is_totally_visible,
        is_totally_visible_through_frame,
    };
    use crate::dimension::{
        ClosestScrollable, DroppableConfig, DroppableDescriptor, DroppableDimension,
        DroppableType, Viewport,
    };
    use crate::geometry::BoxModel;

    const FRAME: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn partial_visibility_cases() {
        let visible = |x0, y0, x1, y1| {
            is_partially_visible_through_frame(FRAME, Rect::new(x0, y0, x1, y1))
        };
        // Contained.
        assert!(visible(10.0, 10.0, 20.0, 20.0));
        // Poking out of one corner.
        assert!(visible(90.0, 90.0, 120.0, 120.0));
        // Touching an edge counts.
        assert!(visible(100.0, 0.0, 120.0, 20.0));
        // Bigger than the frame on both axes.
        assert!(visible(-10.0, -10.0, 110.0, 110.0));
        // Taller than the frame and overlapping horizontally.
        assert!(visible(10.0, -10.0, 20.0, 110.0));
        // Taller than the frame but entirely to the right.
        assert!(!visible(110.0, -10.0, 120.0, 110.0));
        // Fully outside.
        assert!(!visible(0.0, 120.0, 10.0, 130.0));
    }

    #[test]
    fn total_visibility_needs_every_edge() {
        assert!(is_totally_visible_through_frame(FRAME, FRAME));
        assert!(!is_totally_visible_through_frame(FRAME, Rect::new(50.0, 50.0, 100.1, 60.0)));
    }

    fn scrollable_list() -> DroppableDimension {
        DroppableDimension::new(
            DroppableDescriptor {
                id: "list".into(),
                kind: DroppableType::default(),
            },
            &DroppableConfig::default(),
            BoxModel::from_border_box(Rect::new(0.0, 0.0, 100.0, 1000.0)),
            Vec2::ZERO,
            Some(ClosestScrollable {
                client: BoxModel::from_border_box(Rect::new(0.0, 0.0, 100.0, 200.0)),
                scroll_size: Size::new(100.0, 1000.0),
                scroll: Vec2::ZERO,
            }),
        )
    }

    #[test]
    fn droppable_scroll_brings_items_into_view() {
        let viewport = Viewport::new(Size::new(800.0, 600.0), Vec2::ZERO, Vec2::ZERO);
        let list = scrollable_list();
        let item = Rect::new(0.0, 300.0, 100.0, 350.0);

        assert!(!is_partially_visible(item, &list, &viewport, true));

        let scrolled = list.scrolled(Vec2::new(0.0, 200.0));
        assert!(is_partially_visible(item, &scrolled, &viewport, true));
        assert!(is_totally_visible(item, &scrolled, &viewport, true));
        // Without displacement the captured position is still hidden.
        assert!(!is_partially_visible(item, &scrolled, &viewport, false));
    }

    #[test]
    fn viewport_must_also_show_the_target() {
        let viewport = Viewport::new(Size::new(800.0, 100.0), Vec2::ZERO, Vec2::ZERO);
        let list = scrollable_list();
        let item = Rect::new(0.0, 150.0, 100.0, 190.0);
        assert!(!is_partially_visible(item, &list, &viewport, true));
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cmp::Ordering;

use kurbo::{Point, Rect};

use crate::dimension::{DroppableDimension, Viewport};
use crate::geometry::{clip, is_position_in_frame};

/// The region of `droppable` the user can currently see, if any.
fn visible_region(droppable: &DroppableDimension, viewport: &Viewport) -> Option<Rect> {
    clip(viewport.frame, droppable.subject.active?)
}

/// The droppable under `center`.
///
/// Only the part of each droppable visible through its frame and the viewport
/// is hit tested, edges included. When nested droppables both contain the
/// point, the one with the smallest visible area wins; equal areas fall back
/// to id order so the result does not depend on iteration order.
///
/// Enabled state and type are not considered here.
pub fn get_droppable_over<'a>(
    center: Point,
    droppables: impl IntoIterator<Item = &'a DroppableDimension>,
    viewport: &Viewport,
) -> Option<&'a DroppableDimension> {
    droppables
        .into_iter()
        .filter_map(|droppable| {
            let region = visible_region(droppable, viewport)?;
            is_position_in_frame(region, center).then_some((droppable, region.area()))
        })
        .min_by(|(a, area_a), (b, area_b)| {
            area_a
                .partial_cmp(area_b)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id().cmp(b.id()))
        })
        .map(|(droppable, _)| droppable)
}

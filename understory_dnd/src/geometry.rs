// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aware rectangle and point helpers, and nested box models.
//!
//! Everything in this module is a pure function over [`kurbo`] values.
//! Rectangles are `Rect { x0, y0, x1, y1 }` with `x0 <= x1`, `y0 <= y1`.

use kurbo::{Insets, Point, Rect, Vec2};

/// The primary axis of a droppable.
///
/// All displacement and scroll math is written against an [`Axis`] so it works
/// unchanged for vertical and horizontal lists: `start`/`end`/`size` read the
/// main axis, and the `cross_*` accessors read the other one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Items flow top to bottom; the main line is `y`.
    #[default]
    Vertical,
    /// Items flow left to right; the main line is `x`.
    Horizontal,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }

    /// Coordinate of `point` along this axis.
    #[inline]
    pub fn line(self, point: Point) -> f64 {
        match self {
            Self::Vertical => point.y,
            Self::Horizontal => point.x,
        }
    }

    /// Component of `v` along this axis.
    #[inline]
    pub fn line_of(self, v: Vec2) -> f64 {
        match self {
            Self::Vertical => v.y,
            Self::Horizontal => v.x,
        }
    }

    /// Coordinate of `point` along the cross axis.
    #[inline]
    pub fn cross_line(self, point: Point) -> f64 {
        self.cross().line(point)
    }

    /// Leading edge of `rect` along this axis (`top` or `left`).
    #[inline]
    pub fn start(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y0,
            Self::Horizontal => rect.x0,
        }
    }

    /// Trailing edge of `rect` along this axis (`bottom` or `right`).
    #[inline]
    pub fn end(self, rect: Rect) -> f64 {
        match self {
            Self::Vertical => rect.y1,
            Self::Horizontal => rect.x1,
        }
    }

    /// Extent of `rect` along this axis (`height` or `width`).
    #[inline]
    pub fn size(self, rect: Rect) -> f64 {
        self.end(rect) - self.start(rect)
    }

    /// Midpoint of `rect` along this axis.
    #[inline]
    pub fn center(self, rect: Rect) -> f64 {
        0.5 * (self.start(rect) + self.end(rect))
    }

    /// Leading edge of `rect` along the cross axis.
    #[inline]
    pub fn cross_start(self, rect: Rect) -> f64 {
        self.cross().start(rect)
    }

    /// Trailing edge of `rect` along the cross axis.
    #[inline]
    pub fn cross_end(self, rect: Rect) -> f64 {
        self.cross().end(rect)
    }

    /// Extent of `rect` along the cross axis.
    #[inline]
    pub fn cross_size(self, rect: Rect) -> f64 {
        self.cross().size(rect)
    }

    /// Build a vector from a main-axis and a cross-axis component.
    #[inline]
    pub fn patch(self, line: f64, cross: f64) -> Vec2 {
        match self {
            Self::Vertical => Vec2::new(cross, line),
            Self::Horizontal => Vec2::new(line, cross),
        }
    }

    /// Build a point from a main-axis and a cross-axis coordinate.
    #[inline]
    pub fn patch_point(self, line: f64, cross: f64) -> Point {
        self.patch(line, cross).to_point()
    }
}

/// Grow `rect` outward by `insets` (`x0` left, `y0` top, `x1` right, `y1` bottom).
#[inline]
pub fn expand(rect: Rect, insets: Insets) -> Rect {
    Rect::new(
        rect.x0 - insets.x0,
        rect.y0 - insets.y0,
        rect.x1 + insets.x1,
        rect.y1 + insets.y1,
    )
}

/// Shrink `rect` inward by `insets`.
#[inline]
pub fn shrink(rect: Rect, insets: Insets) -> Rect {
    Rect::new(
        rect.x0 + insets.x0,
        rect.y0 + insets.y0,
        rect.x1 - insets.x1,
        rect.y1 - insets.y1,
    )
}

/// Whether `point` lies in `frame`, edges included.
#[inline]
pub fn is_position_in_frame(frame: Rect, point: Point) -> bool {
    frame.x0 <= point.x && point.x <= frame.x1 && frame.y0 <= point.y && point.y <= frame.y1
}

/// The part of `subject` inside `frame`, edges included.
///
/// Rectangles that only touch, or a subject with no area, give a degenerate
/// rectangle. `None` means the two are disjoint.
pub fn clip(frame: Rect, subject: Rect) -> Option<Rect> {
    let clipped = Rect::new(
        frame.x0.max(subject.x0),
        frame.y0.max(subject.y0),
        frame.x1.min(subject.x1),
        frame.y1.min(subject.y1),
    );
    if clipped.width() < 0.0 || clipped.height() < 0.0 {
        None
    } else {
        Some(clipped)
    }
}

/// A border box together with the margin, border and padding around it.
///
/// The four boxes nest: `margin_box ⊇ border_box ⊇ padding_box ⊇ content_box`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxModel {
    /// Border box grown by the margin.
    pub margin_box: Rect,
    /// The measured box.
    pub border_box: Rect,
    /// Border box shrunk by the border widths.
    pub padding_box: Rect,
    /// Padding box shrunk by the padding.
    pub content_box: Rect,
    /// Margin widths.
    pub margin: Insets,
    /// Border widths.
    pub border: Insets,
    /// Padding widths.
    pub padding: Insets,
}

impl BoxModel {
    /// Compose a box model around `border_box`.
    pub fn new(border_box: Rect, margin: Insets, border: Insets, padding: Insets) -> Self {
        let margin_box = expand(border_box, margin);
        let padding_box = shrink(border_box, border);
        let content_box = shrink(padding_box, padding);
        Self {
            margin_box,
            border_box,
            padding_box,
            content_box,
            margin,
            border,
            padding,
        }
    }

    /// A box model with no margin, border or padding.
    pub fn from_border_box(border_box: Rect) -> Self {
        Self::new(border_box, Insets::ZERO, Insets::ZERO, Insets::ZERO)
    }

    /// The same box model moved by `delta`.
    #[must_use]
    pub fn offset(&self, delta: Vec2) -> Self {
        Self::new(self.border_box + delta, self.margin, self.border, self.padding)
    }

    /// Convert a viewport-relative (client) box into a page box given the window scroll.
    #[must_use]
    pub fn with_scroll(&self, window_scroll: Vec2) -> Self {
        self.offset(window_scroll)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptors, dimensions and the viewport.
//!
//! A *descriptor* is the small, stable identity of a draggable or droppable.
//! A *dimension* is a snapshot of its geometry, captured on demand and never
//! mutated afterwards: scrolling or toggling a droppable produces a new value.
//!
//! Two coordinate spaces are used:
//! - *client*: relative to the viewport, as measured;
//! - *page*: client plus the window scroll at capture time.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Rect, Size, Vec2};

use crate::geometry::{Axis, BoxModel, clip};
use crate::scroll::{ScrollDetails, get_max_scroll};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub String);

        impl $name {
            /// The id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(String::from(value))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Stable identity of a draggable.
    DraggableId
);
string_id!(
    /// Stable identity of a droppable.
    DroppableId
);
string_id!(
    /// Compatibility tag of a droppable. A drag only interacts with droppables
    /// of the same type as its home droppable.
    DroppableType
);

impl Default for DroppableType {
    fn default() -> Self {
        Self::from("DEFAULT")
    }
}

/// Identity and structural position of a draggable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DraggableDescriptor {
    /// Stable id.
    pub id: DraggableId,
    /// The droppable that owns this draggable.
    pub droppable_id: DroppableId,
    /// Position within the owning droppable.
    pub index: usize,
}

/// Identity of a droppable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroppableDescriptor {
    /// Stable id.
    pub id: DroppableId,
    /// Compatibility partition.
    pub kind: DroppableType,
}

/// Where a draggable sits: a droppable and an index within it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DraggableLocation {
    /// Owning droppable.
    pub droppable_id: DroppableId,
    /// Index within the droppable.
    pub index: usize,
}

/// Per-droppable configuration supplied at registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroppableConfig {
    /// Direction items flow in.
    pub direction: Axis,
    /// Reject drops (the droppable is collected but disabled).
    pub is_drop_disabled: bool,
    /// Allow combining a dragged item with an item in this list.
    pub is_combine_enabled: bool,
    /// Do not clip the droppable against its closest scroll container.
    pub ignore_container_clipping: bool,
}

impl Default for DroppableConfig {
    fn default() -> Self {
        Self {
            direction: Axis::Vertical,
            is_drop_disabled: false,
            is_combine_enabled: false,
            ignore_container_clipping: false,
        }
    }
}

/// CSS-like box sizing of a placeholder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoxSizing {
    /// Size applies to the content box.
    ContentBox,
    /// Size applies to the border box.
    #[default]
    BorderBox,
}

/// What the rendering layer needs to hold the space of a lifted draggable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placeholder {
    /// Client geometry of the draggable.
    pub client: BoxModel,
    /// Element tag of the draggable, e.g. `"div"` or `"li"`.
    pub tag_name: String,
    /// Display mode, e.g. `"block"`.
    pub display: String,
    /// Sizing mode.
    pub box_sizing: BoxSizing,
}

/// Geometry of a draggable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DraggableDimension {
    /// Identity.
    pub descriptor: DraggableDescriptor,
    /// Placeholder description.
    pub placeholder: Placeholder,
    /// Viewport-relative box.
    pub client: BoxModel,
    /// Page box (client plus window scroll).
    pub page: BoxModel,
}

impl DraggableDimension {
    /// Build a dimension from a client box model and the window scroll.
    ///
    /// The placeholder defaults to a block `div` with border-box sizing; use
    /// [`with_placeholder`](Self::with_placeholder) to describe the real element.
    pub fn new(descriptor: DraggableDescriptor, client: BoxModel, window_scroll: Vec2) -> Self {
        Self {
            descriptor,
            placeholder: Placeholder {
                client,
                tag_name: String::from("div"),
                display: String::from("block"),
                box_sizing: BoxSizing::BorderBox,
            },
            client,
            page: client.with_scroll(window_scroll),
        }
    }

    /// Replace the placeholder tag, display and sizing mode.
    #[must_use]
    pub fn with_placeholder(
        mut self,
        tag_name: impl Into<String>,
        display: impl Into<String>,
        box_sizing: BoxSizing,
    ) -> Self {
        self.placeholder.tag_name = tag_name.into();
        self.placeholder.display = display.into();
        self.placeholder.box_sizing = box_sizing;
        self
    }

    /// Id shortcut.
    pub fn id(&self) -> &DraggableId {
        &self.descriptor.id
    }
}

/// The scroll container closest to a droppable, as measured by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClosestScrollable {
    /// Client box model of the scroll container element.
    pub client: BoxModel,
    /// Full scrollable content size (`scrollWidth`/`scrollHeight`).
    pub scroll_size: Size,
    /// Scroll offset at capture time.
    pub scroll: Vec2,
}

/// The clipping frame of a scrollable droppable.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scrollable {
    /// Page margin box of the scroll container.
    pub page_margin_box: Rect,
    /// Whether the droppable is clipped to this frame.
    pub should_clip_subject: bool,
    /// Scroll state of the container.
    pub scroll: ScrollDetails,
}

/// The droppable's own area and the part of it that is visible through its frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subject {
    /// Page margin box at capture time.
    pub page_margin_box: Rect,
    /// The margin box moved by the frame's scroll and clipped to it; `None` when clipped away.
    pub active: Option<Rect>,
}

impl Subject {
    fn new(page_margin_box: Rect, frame: Option<&Scrollable>) -> Self {
        let active = match frame {
            None => Some(page_margin_box),
            Some(frame) => {
                let displaced = page_margin_box + frame.scroll.diff.displacement;
                if frame.should_clip_subject {
                    clip(frame.page_margin_box, displaced)
                } else {
                    Some(displaced)
                }
            }
        };
        Self {
            page_margin_box,
            active,
        }
    }
}

/// Geometry of a droppable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroppableDimension {
    /// Identity.
    pub descriptor: DroppableDescriptor,
    /// Direction items flow in.
    pub axis: Axis,
    /// Whether drops are accepted.
    pub is_enabled: bool,
    /// Whether combining is enabled.
    pub is_combine_enabled: bool,
    /// Viewport-relative box.
    pub client: BoxModel,
    /// Page box.
    pub page: BoxModel,
    /// Closest scroll container, if any.
    pub frame: Option<Scrollable>,
    /// Visible area.
    pub subject: Subject,
}

impl DroppableDimension {
    /// Build a droppable dimension from measured geometry.
    pub fn new(
        descriptor: DroppableDescriptor,
        config: &DroppableConfig,
        client: BoxModel,
        window_scroll: Vec2,
        closest: Option<ClosestScrollable>,
    ) -> Self {
        let page = client.with_scroll(window_scroll);
        let frame = closest.map(|closest| {
            let frame_page = closest.client.with_scroll(window_scroll);
            let max = get_max_scroll(closest.scroll_size, closest.client.padding_box.size());
            Scrollable {
                page_margin_box: frame_page.margin_box,
                should_clip_subject: !config.ignore_container_clipping,
                scroll: ScrollDetails::new(closest.scroll, max),
            }
        });
        let subject = Subject::new(page.margin_box, frame.as_ref());
        Self {
            descriptor,
            axis: config.direction,
            is_enabled: !config.is_drop_disabled,
            is_combine_enabled: config.is_combine_enabled,
            client,
            page,
            frame,
            subject,
        }
    }

    /// Id shortcut.
    pub fn id(&self) -> &DroppableId {
        &self.descriptor.id
    }

    /// The same droppable after its frame scrolled to `new_scroll`.
    ///
    /// Droppables without a frame are returned unchanged.
    #[must_use]
    pub fn scrolled(&self, new_scroll: Vec2) -> Self {
        let Some(frame) = self.frame.as_ref() else {
            return self.clone();
        };
        let frame = Scrollable {
            scroll: frame.scroll.scroll_to(new_scroll),
            ..*frame
        };
        Self {
            subject: Subject::new(self.subject.page_margin_box, Some(&frame)),
            frame: Some(frame),
            ..self.clone()
        }
    }

    /// The same droppable with a different enabled state.
    #[must_use]
    pub fn with_enabled(&self, is_enabled: bool) -> Self {
        Self {
            is_enabled,
            ..self.clone()
        }
    }

    /// How far content inside this droppable moved because of its own scroll.
    pub fn scroll_displacement(&self) -> Vec2 {
        self.frame
            .as_ref()
            .map_or(Vec2::ZERO, |frame| frame.scroll.diff.displacement)
    }

    /// How far this droppable has scrolled since capture.
    pub fn scroll_diff(&self) -> Vec2 {
        self.frame
            .as_ref()
            .map_or(Vec2::ZERO, |frame| frame.scroll.diff.value)
    }
}

/// The visible window, treated as a droppable without a descriptor.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Visible area in page coordinates.
    pub frame: Rect,
    /// Window scroll.
    pub scroll: ScrollDetails,
}

impl Viewport {
    /// A viewport of `size` scrolled to `scroll`, with the given maximum scroll.
    pub fn new(size: Size, scroll: Vec2, max_scroll: Vec2) -> Self {
        Self {
            frame: Rect::from_origin_size(scroll.to_point(), size),
            scroll: ScrollDetails::new(scroll, max_scroll),
        }
    }

    /// The viewport after the window scrolled to `new_scroll` (clamped into `[0, max]`).
    #[must_use]
    pub fn scroll_to(&self, new_scroll: Vec2) -> Self {
        let scroll = self.scroll.scroll_to(new_scroll);
        Self {
            frame: Rect::from_origin_size(scroll.current.to_point(), self.frame.size()),
            scroll,
        }
    }
}

/// Every dimension known for the current drag.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionMap {
    /// Draggables by id.
    pub draggables: HashMap<DraggableId, DraggableDimension>,
    /// Droppables by id.
    pub droppables: HashMap<DroppableId, DroppableDimension>,
}

impl DimensionMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a draggable.
    pub fn insert_draggable(&mut self, dimension: DraggableDimension) {
        self.draggables
            .insert(dimension.descriptor.id.clone(), dimension);
    }

    /// Insert or replace a droppable.
    pub fn insert_droppable(&mut self, dimension: DroppableDimension) {
        self.droppables
            .insert(dimension.descriptor.id.clone(), dimension);
    }

    /// Merge `other` into `self`, replacing existing entries.
    pub fn extend(&mut self, other: Self) {
        self.draggables.extend(other.draggables);
        self.droppables.extend(other.droppables);
    }

    /// Draggables owned by `droppable`, ordered by index (ties by id).
    pub fn draggables_inside(&self, droppable: &DroppableId) -> Vec<&DraggableDimension> {
        let mut inside: Vec<_> = self
            .draggables
            .values()
            .filter(|d| &d.descriptor.droppable_id == droppable)
            .collect();
        inside.sort_by(|a, b| {
            a.descriptor
                .index
                .cmp(&b.descriptor.index)
                .then_with(|| a.descriptor.id.cmp(&b.descriptor.id))
        });
        inside
    }
}

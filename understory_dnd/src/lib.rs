// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dnd --heading-base-level=0

//! Understory DnD: the geometry and coordination core of reorderable
//! drag-and-drop lists.
//!
//! This crate knows nothing about pointers, keys, rendering or animation. It
//! answers the questions a drag-and-drop host asks while an item is moving:
//!
//! - **Where is everything?** The [`marshal`] module keeps a registry of
//!   draggables and droppables and collects their [`dimension`]s when a drag
//!   starts: the dragged item and its home synchronously, everything else over
//!   a read frame and a write frame scheduled on an injected
//!   [`understory_frame::FrameScheduler`].
//! - **Where would it land?** [`compute_impact`] turns the dragged item's
//!   current center into a [`DragImpact`]: the destination list and index, and
//!   which siblings move out of the way. [`move_to_next_index`] does the same
//!   for keyboard moves.
//! - **Should anything scroll?** The [`auto_scroll`] module scrolls the window
//!   or the droppable under the item, fluidly for pointer drags and in jumps for
//!   keyboard drags.
//!
//! The math underneath lives in [`geometry`] (axis-aware rectangles and box
//! models), [`visibility`] (frame-clipped visibility) and [`scroll`] (scroll
//! ranges and overlap).
//!
//! Geometry is expressed in [`kurbo`] types. Client boxes are viewport
//! relative; page boxes add the window scroll.
//!
//! ## Minimal example
//!
//! Drag the first of two stacked items past the middle of the second:
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_dnd::{
//!     BoxModel, DimensionMap, DragImpact, DraggableDescriptor, DraggableDimension,
//!     DroppableConfig, DroppableDescriptor, DroppableDimension, DroppableType, ImpactInput,
//!     Viewport, compute_impact,
//! };
//!
//! let mut dimensions = DimensionMap::new();
//! dimensions.insert_droppable(DroppableDimension::new(
//!     DroppableDescriptor { id: "list".into(), kind: DroppableType::default() },
//!     &DroppableConfig::default(),
//!     BoxModel::from_border_box(Rect::new(0.0, 0.0, 100.0, 80.0)),
//!     Vec2::ZERO,
//!     None,
//! ));
//! for index in 0..2 {
//!     let y = index as f64 * 40.0;
//!     dimensions.insert_draggable(DraggableDimension::new(
//!         DraggableDescriptor {
//!             id: format!("item-{index}").into(),
//!             droppable_id: "list".into(),
//!             index,
//!         },
//!         BoxModel::from_border_box(Rect::new(0.0, y, 100.0, y + 40.0)),
//!         Vec2::ZERO,
//!     ));
//! }
//! let viewport = Viewport::new(Size::new(800.0, 600.0), Vec2::ZERO, Vec2::ZERO);
//!
//! let impact = compute_impact(ImpactInput {
//!     page_border_box_center: Point::new(50.0, 70.0),
//!     draggable: &"item-0".into(),
//!     dimensions: &dimensions,
//!     previous_impact: &DragImpact::none(),
//!     viewport: &viewport,
//! });
//!
//! assert_eq!(impact.destination.as_ref().map(|location| location.index), Some(1));
//! assert!(impact.is_displaced(&"item-1".into()));
//! ```
//!
//! Everything here is single-threaded by construction (`Rc`/`RefCell`).
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize`/`Deserialize` for descriptors, configuration,
//!   dimensions and impacts.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod auto_scroll;
pub mod dimension;
pub mod geometry;
pub mod impact;
pub mod keyboard;
pub mod marshal;
pub mod scroll;
pub mod visibility;

pub use auto_scroll::{AutoScrollConfig, FluidScroller, jump_scroll};
pub use dimension::{
    DimensionMap, DraggableDescriptor, DraggableDimension, DraggableId, DraggableLocation,
    DroppableConfig, DroppableDescriptor, DroppableDimension, DroppableId, DroppableType,
    Viewport,
};
pub use geometry::{Axis, BoxModel};
pub use impact::{DragImpact, ImpactInput, compute_impact};
pub use keyboard::{MoveInput, MoveResult, move_to_next_index};
pub use marshal::{Marshal, MarshalCallbacks, MarshalError};

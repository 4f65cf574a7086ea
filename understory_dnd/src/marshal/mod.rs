// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dimension registry and marshal.
//!
//! Hosts register every draggable and droppable with a [`Marshal`] for as long
//! as they are mounted. Registration is cheap: it stores a descriptor and a
//! [`DraggableSource`] / [`DroppableSource`] that can measure the item on demand.
//!
//! When a drag starts, the marshal coordinates measurement:
//!
//! 1. [`Marshal::start_publishing`] synchronously measures only the dragged
//!    item and its home droppable (the "critical" dimensions).
//! 2. [`Marshal::collect`] schedules a two-frame cycle. The first frame reads
//!    every other same-type dimension; the second frame delivers them through
//!    [`MarshalCallbacks::bulk_replace`]. Reads never share a frame with writes.
//! 3. While dragging, draggables may still mount and unmount. Those changes are
//!    staged and delivered through [`MarshalCallbacks::publish`], again with a
//!    read frame followed by a write frame.
//! 4. [`Marshal::stop_publishing`] cancels pending frames and tells same-type
//!    droppables to stop watching their scroll.
//!
//! The marshal is a cheap handle; clones share the same state. No internal
//! borrow is held while sources or callbacks run, so both may call back into
//! the marshal.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashSet;
use kurbo::Vec2;
use understory_frame::FrameScheduler;

use crate::dimension::{
    DimensionMap, DraggableDescriptor, DraggableDimension, DraggableId, DroppableDescriptor,
    DroppableDimension, DroppableId, Viewport,
};

mod bulk;
mod error;
mod publisher;
mod registry;

pub use error::{MarshalError, Result};
pub use registry::{DraggableRegistration, DroppableRegistration, Registration};

use bulk::PendingBulk;
use publisher::{PendingPublish, Staging};
use registry::Registry;

/// Measures a registered draggable.
pub trait DraggableSource {
    /// Current geometry, with page boxes offset by `window_scroll`.
    fn get_dimension(&self, window_scroll: Vec2) -> DraggableDimension;
}

/// Measures a registered droppable and reports on its scroll container.
pub trait DroppableSource {
    /// Current geometry. The droppable should start watching its scroll
    /// container and report changes through [`Marshal::update_droppable_scroll`].
    fn get_dimension_and_watch_scroll(
        &self,
        window_scroll: Vec2,
        options: ScrollOptions,
    ) -> DroppableDimension;

    /// Re-measure a droppable that is already being watched.
    fn recollect(&self, options: RecollectOptions) -> DroppableDimension;

    /// Scroll the droppable's frame by `change`.
    fn scroll(&self, change: Vec2);

    /// The drag ended; stop watching scroll.
    fn drag_stopped(&self);
}

/// Receives everything the marshal publishes.
pub trait MarshalCallbacks {
    /// A collection cycle was scheduled.
    fn collection_starting(&self);
    /// Draggables were added or removed mid-drag.
    fn publish(&self, published: Published);
    /// The bulk collection finished.
    fn bulk_replace(&self, replace: BulkReplace);
    /// A watched droppable's frame scrolled.
    fn update_droppable_scroll(&self, id: &DroppableId, offset: Vec2);
    /// A droppable was enabled or disabled.
    fn update_droppable_is_enabled(&self, id: &DroppableId, is_enabled: bool);
    /// Something tolerable but noteworthy happened.
    fn diagnostic(&self, diagnostic: Diagnostic) {
        let _ = diagnostic;
    }
}

/// How droppables should report scroll while dragging.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollOptions {
    /// Report scroll changes synchronously instead of once per frame.
    pub should_publish_immediately: bool,
}

/// Options for [`DroppableSource::recollect`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecollectOptions {
    /// Measure as if the placeholder were not inserted.
    pub without_placeholder: bool,
}

/// Request to start a drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiftRequest {
    /// The item being lifted.
    pub draggable_id: DraggableId,
    /// How droppables should report scroll.
    pub scroll_options: ScrollOptions,
}

/// Request to collect everything besides the critical dimensions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollectOptions {
    /// The viewport the collection is published with.
    pub viewport: Viewport,
}

/// The dragged item and its home droppable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Critical {
    /// The dragged item.
    pub draggable: DraggableDescriptor,
    /// Its home.
    pub droppable: DroppableDescriptor,
}

/// Result of [`Marshal::start_publishing`].
#[derive(Clone, Debug, PartialEq)]
pub struct InitialPublish {
    /// The dragged item and its home.
    pub critical: Critical,
    /// Dimensions of exactly those two.
    pub dimensions: DimensionMap,
}

/// The completed bulk collection.
#[derive(Clone, Debug, PartialEq)]
pub struct BulkReplace {
    /// Every same-type dimension except the critical ones.
    pub dimensions: DimensionMap,
    /// Viewport at publish time.
    pub viewport: Viewport,
    /// The drag being collected for.
    pub critical: Critical,
}

/// Changes to the draggable set while dragging.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Published {
    /// Newly mounted draggables, ordered by home, then index.
    pub additions: Vec<DraggableDimension>,
    /// Unmounted draggables, ordered by id.
    pub removals: Vec<DraggableId>,
    /// Re-measured homes of the added and removed draggables, ordered by id.
    pub modified: Vec<DroppableDimension>,
}

/// Non-fatal events worth surfacing to a developer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// Draggables were added or removed during a drag. Reported once per drag.
    DynamicChangeDuringDrag {
        /// The first draggable that changed.
        draggable: DraggableId,
    },
}

/// State that only exists between `start_publishing` and `stop_publishing`.
struct Collection {
    critical: Critical,
    scroll_options: ScrollOptions,
    window_scroll: Vec2,
    viewport: Option<Viewport>,
    bulk: Option<PendingBulk>,
    publish: Option<PendingPublish>,
    staging: Staging,
    /// Droppables the consumer has received a dimension for.
    published: HashSet<DroppableId>,
    /// Draggables the consumer holds or will receive from a cycle already read.
    delivered: HashSet<DraggableId>,
    has_warned: bool,
}

impl Collection {
    /// Whether `id` has been measured with its scroll watched, by the lift or
    /// by a bulk read.
    fn is_watched(&self, id: &DroppableId) -> bool {
        self.published.contains(id)
            || self
                .bulk
                .as_ref()
                .and_then(|bulk| bulk.collected.as_ref())
                .is_some_and(|collected| collected.droppables.contains_key(id))
    }
}

struct Inner {
    scheduler: Rc<dyn FrameScheduler>,
    callbacks: Rc<dyn MarshalCallbacks>,
    registry: RefCell<Registry>,
    collection: RefCell<Option<Collection>>,
    next_token: Cell<u64>,
}

/// Registry of draggables and droppables that publishes their dimensions
/// during a drag.
///
/// See the [module documentation](self) for the collection protocol.
#[derive(Clone)]
pub struct Marshal {
    inner: Rc<Inner>,
}

impl fmt::Debug for Marshal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (draggables, droppables) = self.inner.registry.borrow().len();
        let collecting = self
            .inner
            .collection
            .borrow()
            .as_ref()
            .map(|collection| collection.critical.draggable.id.clone());
        f.debug_struct("Marshal")
            .field("draggables", &draggables)
            .field("droppables", &droppables)
            .field("collecting", &collecting)
            .finish_non_exhaustive()
    }
}

impl Marshal {
    /// Create a marshal that schedules frames on `scheduler` and reports to `callbacks`.
    pub fn new(scheduler: Rc<dyn FrameScheduler>, callbacks: Rc<dyn MarshalCallbacks>) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                callbacks,
                registry: RefCell::new(Registry::default()),
                collection: RefCell::new(None),
                next_token: Cell::new(0),
            }),
        }
    }

    fn next_token(&self) -> u64 {
        let token = self.inner.next_token.get() + 1;
        self.inner.next_token.set(token);
        token
    }

    /// Schedule `run` on the next frame without keeping the marshal alive.
    fn schedule_frame(&self, run: impl FnOnce(Self) + 'static) -> understory_frame::FrameHandle {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        self.inner.scheduler.schedule(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                run(Self { inner });
            }
        }))
    }

    /// Whether a drag is being collected for.
    pub fn is_collecting(&self) -> bool {
        self.inner.collection.borrow().is_some()
    }

    /// The drag being collected for, if any.
    pub fn critical(&self) -> Option<Critical> {
        self.inner
            .collection
            .borrow()
            .as_ref()
            .map(|collection| collection.critical.clone())
    }

    fn ensure_not_critical(&self, id: &DraggableId) -> Result<()> {
        let collection = self.inner.collection.borrow();
        match collection.as_ref() {
            Some(collection) if &collection.critical.draggable.id == id => {
                Err(MarshalError::CriticalMutation(id.clone()))
            }
            _ => Ok(()),
        }
    }

    fn ensure_idle_for_droppable(&self, id: &DroppableId) -> Result<()> {
        if self.is_collecting() {
            return Err(MarshalError::DroppableChangeDuringDrag(id.clone()));
        }
        Ok(())
    }

    /// Register a draggable.
    ///
    /// During a drag the addition is staged and published. Re-registering the
    /// dragged item itself is an error.
    pub fn register_draggable(
        &self,
        descriptor: DraggableDescriptor,
        source: Rc<dyn DraggableSource>,
    ) -> Result<DraggableRegistration> {
        self.ensure_not_critical(&descriptor.id)?;
        let registration = self
            .inner
            .registry
            .borrow_mut()
            .insert_draggable(descriptor.clone(), source);
        self.stage_addition(&descriptor);
        Ok(registration)
    }

    /// Replace the registration `previous` with `descriptor`.
    ///
    /// A stale `previous` only registers the new descriptor.
    pub fn update_draggable(
        &self,
        previous: &DraggableRegistration,
        descriptor: DraggableDescriptor,
        source: Rc<dyn DraggableSource>,
    ) -> Result<DraggableRegistration> {
        let is_current = self.inner.registry.borrow().is_current_draggable(previous)?;
        if is_current {
            self.ensure_not_critical(&previous.descriptor().id)?;
        }
        self.ensure_not_critical(&descriptor.id)?;

        if is_current {
            self.inner
                .registry
                .borrow_mut()
                .remove_draggable(&previous.descriptor().id);
            self.stage_removal(previous.descriptor());
        }
        let registration = self
            .inner
            .registry
            .borrow_mut()
            .insert_draggable(descriptor.clone(), source);
        self.stage_addition(&descriptor);
        Ok(registration)
    }

    /// Remove a draggable.
    ///
    /// Unregistering through a stale handle does nothing. During a drag the
    /// removal is staged and published; removing the dragged item is an error.
    pub fn unregister_draggable(&self, registration: &DraggableRegistration) -> Result<()> {
        if !self
            .inner
            .registry
            .borrow()
            .is_current_draggable(registration)?
        {
            return Ok(());
        }
        self.ensure_not_critical(&registration.descriptor().id)?;
        self.inner
            .registry
            .borrow_mut()
            .remove_draggable(&registration.descriptor().id);
        self.stage_removal(registration.descriptor());
        Ok(())
    }

    /// Register a droppable. Not allowed during a drag.
    pub fn register_droppable(
        &self,
        descriptor: DroppableDescriptor,
        source: Rc<dyn DroppableSource>,
    ) -> Result<DroppableRegistration> {
        self.ensure_idle_for_droppable(&descriptor.id)?;
        Ok(self
            .inner
            .registry
            .borrow_mut()
            .insert_droppable(descriptor, source))
    }

    /// Replace the registration `previous` with `descriptor`. Not allowed during a drag.
    pub fn update_droppable(
        &self,
        previous: &DroppableRegistration,
        descriptor: DroppableDescriptor,
        source: Rc<dyn DroppableSource>,
    ) -> Result<DroppableRegistration> {
        self.ensure_idle_for_droppable(&previous.descriptor().id)?;
        let mut registry = self.inner.registry.borrow_mut();
        if registry.is_current_droppable(previous)? {
            registry.remove_droppable(&previous.descriptor().id);
        }
        Ok(registry.insert_droppable(descriptor, source))
    }

    /// Remove a droppable. Stale handles do nothing. Not allowed during a drag.
    pub fn unregister_droppable(&self, registration: &DroppableRegistration) -> Result<()> {
        self.ensure_idle_for_droppable(&registration.descriptor().id)?;
        let mut registry = self.inner.registry.borrow_mut();
        if registry.is_current_droppable(registration)? {
            registry.remove_droppable(&registration.descriptor().id);
        }
        Ok(())
    }

    /// Begin a drag: measure the dragged item and its home synchronously.
    pub fn start_publishing(
        &self,
        request: &LiftRequest,
        window_scroll: Vec2,
    ) -> Result<InitialPublish> {
        if self.is_collecting() {
            return Err(MarshalError::AlreadyCollecting);
        }

        let (critical, draggable, droppable) = {
            let registry = self.inner.registry.borrow();
            let draggable = registry
                .draggable(&request.draggable_id)
                .ok_or_else(|| MarshalError::UnknownDraggable(request.draggable_id.clone()))?;
            let home_id = &draggable.descriptor.droppable_id;
            let home = registry
                .droppable(home_id)
                .ok_or_else(|| MarshalError::MissingHome {
                    draggable: request.draggable_id.clone(),
                    droppable: home_id.clone(),
                })?;
            (
                Critical {
                    draggable: draggable.descriptor.clone(),
                    droppable: home.descriptor.clone(),
                },
                draggable.source.clone(),
                home.source.clone(),
            )
        };

        let mut published = HashSet::new();
        published.insert(critical.droppable.id.clone());
        let mut delivered = HashSet::new();
        delivered.insert(critical.draggable.id.clone());
        *self.inner.collection.borrow_mut() = Some(Collection {
            critical: critical.clone(),
            scroll_options: request.scroll_options,
            window_scroll,
            viewport: None,
            bulk: None,
            publish: None,
            staging: Staging::default(),
            published,
            delivered,
            has_warned: false,
        });

        let mut dimensions = DimensionMap::new();
        dimensions.insert_draggable(draggable.get_dimension(window_scroll));
        dimensions.insert_droppable(
            droppable.get_dimension_and_watch_scroll(window_scroll, request.scroll_options),
        );

        tracing::debug!(
            target: "understory_dnd::marshal",
            draggable = %critical.draggable.id,
            droppable = %critical.droppable.id,
            "published critical dimensions"
        );
        Ok(InitialPublish {
            critical,
            dimensions,
        })
    }

    /// End the drag.
    ///
    /// Cancels pending frames, drops staged changes and calls
    /// [`DroppableSource::drag_stopped`] on every droppable of the dragged
    /// type. Does nothing when no drag is active.
    pub fn stop_publishing(&self) {
        let Some(collection) = self.inner.collection.borrow_mut().take() else {
            return;
        };
        if let Some(bulk) = collection.bulk {
            self.inner.scheduler.cancel(bulk.handle);
        }
        if let Some(publish) = collection.publish {
            self.inner.scheduler.cancel(publish.handle);
        }

        let sources: Vec<_> = self
            .inner
            .registry
            .borrow()
            .droppables_of_kind(&collection.critical.droppable.kind)
            .into_iter()
            .map(|entry| entry.source.clone())
            .collect();
        for source in sources {
            source.drag_stopped();
        }

        tracing::debug!(
            target: "understory_dnd::marshal",
            draggable = %collection.critical.draggable.id,
            "stopped publishing"
        );
    }

    /// Ask a droppable to scroll its frame by `change`.
    ///
    /// Does nothing when no drag is active.
    pub fn scroll_droppable(&self, id: &DroppableId, change: Vec2) -> Result<()> {
        if !self.is_collecting() {
            return Ok(());
        }
        let source = self
            .inner
            .registry
            .borrow()
            .droppable(id)
            .map(|entry| entry.source.clone())
            .ok_or_else(|| MarshalError::UnknownDroppable(id.clone()))?;
        source.scroll(change);
        Ok(())
    }

    /// A droppable's frame scrolled to `offset`.
    pub fn update_droppable_scroll(&self, id: &DroppableId, offset: Vec2) {
        self.route_droppable_change(
            id,
            |dimension| dimension.scrolled(offset),
            |callbacks| callbacks.update_droppable_scroll(id, offset),
        );
    }

    /// A droppable was enabled or disabled.
    pub fn update_droppable_is_enabled(&self, id: &DroppableId, is_enabled: bool) {
        self.route_droppable_change(
            id,
            |dimension| dimension.with_enabled(is_enabled),
            |callbacks| callbacks.update_droppable_is_enabled(id, is_enabled),
        );
    }

    /// Apply a droppable change to collected data that is not yet published,
    /// and forward it if the consumer already has the droppable.
    ///
    /// Changes outside a drag, or to droppables of another type, are dropped.
    fn route_droppable_change(
        &self,
        id: &DroppableId,
        fold: impl FnOnce(&DroppableDimension) -> DroppableDimension,
        forward: impl FnOnce(&dyn MarshalCallbacks),
    ) {
        let should_forward = {
            let registry = self.inner.registry.borrow();
            let mut collection = self.inner.collection.borrow_mut();
            let Some(collection) = collection.as_mut() else {
                return;
            };
            if !registry.is_droppable_of_kind(id, &collection.critical.droppable.kind) {
                return;
            }
            let pending = collection
                .bulk
                .as_mut()
                .and_then(|bulk| bulk.collected.as_mut())
                .and_then(|collected| collected.droppables.get_mut(id));
            if let Some(dimension) = pending {
                *dimension = fold(dimension);
            }
            collection.published.contains(id)
        };
        if should_forward {
            forward(&*self.inner.callbacks);
        }
    }

    /// The window scrolled to `scroll`.
    pub fn update_window_scroll(&self, scroll: Vec2) {
        let mut collection = self.inner.collection.borrow_mut();
        if let Some(collection) = collection.as_mut() {
            collection.window_scroll = scroll;
            collection.viewport = collection
                .viewport
                .map(|viewport| viewport.scroll_to(scroll));
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two-frame bulk collection started by [`Marshal::collect`].

use alloc::vec::Vec;

use understory_frame::FrameHandle;

use super::{BulkReplace, CollectOptions, Marshal, MarshalError, Result};
use crate::dimension::DimensionMap;

/// A scheduled bulk cycle.
///
/// `collected` is `None` until the read frame has run.
pub(super) struct PendingBulk {
    pub(super) token: u64,
    pub(super) handle: FrameHandle,
    pub(super) collected: Option<DimensionMap>,
}

impl Marshal {
    /// Collect every dimension of the dragged type besides the critical ones.
    ///
    /// Reads happen on the next frame and the result is delivered through
    /// [`MarshalCallbacks::bulk_replace`](super::MarshalCallbacks::bulk_replace)
    /// on the frame after. Calling this again before delivery cancels the
    /// earlier cycle, so only the latest request is published.
    pub fn collect(&self, options: CollectOptions) -> Result<()> {
        let previous = {
            let mut collection = self.inner.collection.borrow_mut();
            let collection = collection
                .as_mut()
                .ok_or(MarshalError::NoCriticalDimensions)?;
            collection.viewport = Some(options.viewport);
            collection.window_scroll = options.viewport.scroll.current;
            collection.bulk.take()
        };
        if let Some(previous) = previous {
            self.inner.scheduler.cancel(previous.handle);
            tracing::trace!(
                target: "understory_dnd::marshal",
                token = previous.token,
                "cancelled superseded bulk collection"
            );
        }

        let token = self.next_token();
        let handle = self.schedule_frame(move |marshal| marshal.read_bulk(token));
        if let Some(collection) = self.inner.collection.borrow_mut().as_mut() {
            collection.bulk = Some(PendingBulk {
                token,
                handle,
                collected: None,
            });
        }
        tracing::debug!(target: "understory_dnd::marshal", token, "scheduled bulk collection");
        self.inner.callbacks.collection_starting();
        Ok(())
    }

    fn read_bulk(&self, token: u64) {
        let (critical, window_scroll, scroll_options) = {
            let collection = self.inner.collection.borrow();
            let Some(collection) = collection.as_ref() else {
                return;
            };
            let is_current = collection
                .bulk
                .as_ref()
                .is_some_and(|bulk| bulk.token == token && bulk.collected.is_none());
            if !is_current {
                return;
            }
            (
                collection.critical.clone(),
                collection.window_scroll,
                collection.scroll_options,
            )
        };

        let (droppables, draggables) = {
            let registry = self.inner.registry.borrow();
            let kind = &critical.droppable.kind;
            let droppables: Vec<_> = registry
                .droppables_of_kind(kind)
                .into_iter()
                .filter(|entry| entry.descriptor.id != critical.droppable.id)
                .map(|entry| entry.source.clone())
                .collect();
            let draggables: Vec<_> = registry
                .draggables_of_kind(kind)
                .into_iter()
                .filter(|entry| entry.descriptor.id != critical.draggable.id)
                .map(|entry| entry.source.clone())
                .collect();
            (droppables, draggables)
        };

        let mut dimensions = DimensionMap::new();
        for source in droppables {
            dimensions.insert_droppable(
                source.get_dimension_and_watch_scroll(window_scroll, scroll_options),
            );
        }
        for source in draggables {
            dimensions.insert_draggable(source.get_dimension(window_scroll));
        }

        let handle = self.schedule_frame(move |marshal| marshal.write_bulk(token));
        let mut collection = self.inner.collection.borrow_mut();
        match collection.as_mut().filter(|collection| {
            collection
                .bulk
                .as_ref()
                .is_some_and(|bulk| bulk.token == token)
        }) {
            Some(collection) => {
                collection
                    .delivered
                    .extend(dimensions.draggables.keys().cloned());
                if let Some(bulk) = collection.bulk.as_mut() {
                    bulk.handle = handle;
                    bulk.collected = Some(dimensions);
                }
            }
            // A source stopped or restarted the collection while being measured.
            None => self.inner.scheduler.cancel(handle),
        }
    }

    fn write_bulk(&self, token: u64) {
        let replace = {
            let mut collection = self.inner.collection.borrow_mut();
            let Some(collection) = collection.as_mut() else {
                return;
            };
            if !collection.bulk.as_ref().is_some_and(|bulk| bulk.token == token) {
                return;
            }
            let Some(dimensions) = collection.bulk.take().and_then(|bulk| bulk.collected) else {
                return;
            };
            let Some(viewport) = collection.viewport else {
                return;
            };
            collection
                .published
                .extend(dimensions.droppables.keys().cloned());
            BulkReplace {
                dimensions,
                viewport,
                critical: collection.critical.clone(),
            }
        };

        tracing::debug!(
            target: "understory_dnd::marshal",
            token,
            draggables = replace.dimensions.draggables.len(),
            droppables = replace.dimensions.droppables.len(),
            "publishing bulk collection"
        );
        self.inner.callbacks.bulk_replace(replace);
    }
}

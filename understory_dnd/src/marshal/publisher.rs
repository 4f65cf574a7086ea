// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staging and publishing of draggables that mount or unmount mid-drag.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use understory_frame::FrameHandle;

use super::{Diagnostic, Marshal, Published, RecollectOptions};
use crate::dimension::{DraggableDescriptor, DraggableId, DroppableId};

/// Changes waiting for the next publish cycle.
#[derive(Default)]
pub(super) struct Staging {
    additions: HashMap<DraggableId, DraggableDescriptor>,
    removals: HashSet<DraggableId>,
    modified: HashSet<DroppableId>,
}

impl Staging {
    fn add(&mut self, descriptor: &DraggableDescriptor) {
        self.removals.remove(&descriptor.id);
        self.additions
            .insert(descriptor.id.clone(), descriptor.clone());
        self.modified.insert(descriptor.droppable_id.clone());
    }

    /// Stage a removal. Only ids in the consumer's hands need one; for any
    /// other id dropping a pending addition is enough.
    fn remove(&mut self, descriptor: &DraggableDescriptor, is_delivered: bool) {
        self.additions.remove(&descriptor.id);
        if is_delivered {
            self.removals.insert(descriptor.id.clone());
        }
        self.modified.insert(descriptor.droppable_id.clone());
    }

    fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.modified.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Read,
    Write,
}

/// A scheduled publish cycle.
pub(super) struct PendingPublish {
    token: u64,
    pub(super) handle: FrameHandle,
    phase: Phase,
}

#[derive(Copy, Clone)]
enum Change {
    Add,
    Remove,
}

impl Marshal {
    pub(super) fn stage_addition(&self, descriptor: &DraggableDescriptor) {
        self.stage(descriptor, Change::Add);
    }

    pub(super) fn stage_removal(&self, descriptor: &DraggableDescriptor) {
        self.stage(descriptor, Change::Remove);
    }

    /// Stage a change to a draggable whose home has the dragged type.
    fn stage(&self, descriptor: &DraggableDescriptor, change: Change) {
        let is_first_change = {
            let registry = self.inner.registry.borrow();
            let mut collection = self.inner.collection.borrow_mut();
            let Some(collection) = collection.as_mut() else {
                return;
            };
            if !registry
                .is_droppable_of_kind(&descriptor.droppable_id, &collection.critical.droppable.kind)
            {
                return;
            }
            match change {
                Change::Add => collection.staging.add(descriptor),
                Change::Remove => {
                    let is_delivered = collection.delivered.contains(&descriptor.id);
                    collection.staging.remove(descriptor, is_delivered);
                }
            }
            !core::mem::replace(&mut collection.has_warned, true)
        };

        if is_first_change {
            tracing::warn!(
                target: "understory_dnd::marshal",
                draggable = %descriptor.id,
                "draggables changed during a drag; dimensions will be republished"
            );
            self.inner
                .callbacks
                .diagnostic(Diagnostic::DynamicChangeDuringDrag {
                    draggable: descriptor.id.clone(),
                });
        }
        self.schedule_publish();
    }

    /// Schedule a publish cycle unless one is already pending.
    ///
    /// A cycle still in its read phase will pick up the staged changes. One in
    /// its write phase reschedules when it finishes.
    fn schedule_publish(&self) {
        if self
            .inner
            .collection
            .borrow()
            .as_ref()
            .is_none_or(|collection| collection.publish.is_some())
        {
            return;
        }

        let token = self.next_token();
        let handle = self.schedule_frame(move |marshal| marshal.read_publish(token));
        if let Some(collection) = self.inner.collection.borrow_mut().as_mut() {
            collection.publish = Some(PendingPublish {
                token,
                handle,
                phase: Phase::Read,
            });
        }
        self.inner.callbacks.collection_starting();
    }

    fn read_publish(&self, token: u64) {
        let (staging, window_scroll, home) = {
            let mut collection = self.inner.collection.borrow_mut();
            let Some(collection) = collection.as_mut() else {
                return;
            };
            let is_current = collection
                .publish
                .as_ref()
                .is_some_and(|publish| publish.token == token && publish.phase == Phase::Read);
            if !is_current {
                return;
            }
            // Lists nobody watches yet reach the consumer through the bulk
            // read, which measures them as they are then.
            let mut staging = core::mem::take(&mut collection.staging);
            staging
                .additions
                .retain(|_, descriptor| collection.is_watched(&descriptor.droppable_id));
            staging.modified.retain(|id| collection.is_watched(id));
            collection
                .delivered
                .extend(staging.additions.keys().cloned());
            for id in &staging.removals {
                collection.delivered.remove(id);
            }
            (
                staging,
                collection.window_scroll,
                collection.critical.droppable.id.clone(),
            )
        };

        let (additions, modified) = {
            let registry = self.inner.registry.borrow();
            let mut additions: Vec<_> = staging
                .additions
                .keys()
                .filter_map(|id| registry.draggable(id))
                .map(|entry| (entry.descriptor.clone(), entry.source.clone()))
                .collect();
            additions.sort_by(|(a, _), (b, _)| {
                a.droppable_id
                    .cmp(&b.droppable_id)
                    .then(a.index.cmp(&b.index))
                    .then_with(|| a.id.cmp(&b.id))
            });
            let mut modified: Vec<_> = staging
                .modified
                .iter()
                .filter_map(|id| registry.droppable(id))
                .map(|entry| (entry.descriptor.id.clone(), entry.source.clone()))
                .collect();
            modified.sort_by(|(a, _), (b, _)| a.cmp(b));
            (additions, modified)
        };

        let mut removals: Vec<_> = staging.removals.into_iter().collect();
        removals.sort();
        let published = Published {
            additions: additions
                .into_iter()
                .map(|(_, source)| source.get_dimension(window_scroll))
                .collect(),
            removals,
            modified: modified
                .into_iter()
                .map(|(id, source)| {
                    source.recollect(RecollectOptions {
                        without_placeholder: id != home,
                    })
                })
                .collect(),
        };

        let handle = self.schedule_frame(move |marshal| marshal.write_publish(token, published));
        let mut collection = self.inner.collection.borrow_mut();
        match collection
            .as_mut()
            .and_then(|collection| collection.publish.as_mut())
            .filter(|publish| publish.token == token)
        {
            Some(publish) => {
                publish.handle = handle;
                publish.phase = Phase::Write;
            }
            None => self.inner.scheduler.cancel(handle),
        }
    }

    fn write_publish(&self, token: u64, published: Published) {
        let has_more = {
            let mut collection = self.inner.collection.borrow_mut();
            let Some(collection) = collection.as_mut() else {
                return;
            };
            if !collection
                .publish
                .as_ref()
                .is_some_and(|publish| publish.token == token)
            {
                return;
            }
            collection.publish = None;
            collection
                .published
                .extend(published.modified.iter().map(|d| d.descriptor.id.clone()));
            !collection.staging.is_empty()
        };

        tracing::debug!(
            target: "understory_dnd::marshal",
            token,
            additions = published.additions.len(),
            removals = published.removals.len(),
            modified = published.modified.len(),
            "publishing dynamic changes"
        );
        self.inner.callbacks.publish(published);
        if has_more {
            self.schedule_publish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Staging;
    use crate::dimension::{DraggableDescriptor, DraggableId};

    fn descriptor(id: &str) -> DraggableDescriptor {
        DraggableDescriptor {
            id: id.into(),
            droppable_id: "list".into(),
            index: 0,
        }
    }

    #[test]
    fn add_then_remove_cancels_out() {
        let mut staging = Staging::default();
        staging.add(&descriptor("a"));
        staging.remove(&descriptor("a"), false);
        assert!(staging.additions.is_empty());
        assert!(staging.removals.is_empty());
        // The home still has to be re-measured.
        assert!(!staging.is_empty());
    }

    #[test]
    fn removing_a_delivered_item_survives_a_pending_addition() {
        let mut staging = Staging::default();
        staging.add(&descriptor("a"));
        staging.remove(&descriptor("a"), true);
        assert!(staging.additions.is_empty());
        assert!(staging.removals.contains(&DraggableId::from("a")));
    }

    #[test]
    fn remove_then_add_keeps_only_the_addition() {
        let mut staging = Staging::default();
        staging.remove(&descriptor("a"), true);
        staging.add(&descriptor("a"));
        assert!(staging.removals.is_empty());
        assert!(staging.additions.contains_key(&DraggableId::from("a")));
    }
}

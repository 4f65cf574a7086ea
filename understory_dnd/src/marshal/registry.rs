// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-lived registrations of draggables and droppables.

use alloc::rc::Rc;
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::{DraggableSource, DroppableSource, MarshalError, Result};
use crate::dimension::{
    DraggableDescriptor, DraggableId, DroppableDescriptor, DroppableId, DroppableType,
};

/// Handle returned when registering a draggable or droppable.
///
/// The generation identifies this particular registration. If the same id is
/// registered again, older handles become stale and unregistering through them
/// does nothing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Registration<D> {
    descriptor: D,
    generation: u64,
}

impl<D> Registration<D> {
    /// The descriptor this registration was made with.
    pub fn descriptor(&self) -> &D {
        &self.descriptor
    }

    /// Freshness stamp of this registration.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Registration handle of a draggable.
pub type DraggableRegistration = Registration<DraggableDescriptor>;
/// Registration handle of a droppable.
pub type DroppableRegistration = Registration<DroppableDescriptor>;

pub(super) struct DraggableEntry {
    pub(super) descriptor: DraggableDescriptor,
    pub(super) source: Rc<dyn DraggableSource>,
    generation: u64,
}

pub(super) struct DroppableEntry {
    pub(super) descriptor: DroppableDescriptor,
    pub(super) source: Rc<dyn DroppableSource>,
    generation: u64,
}

#[derive(Default)]
pub(super) struct Registry {
    draggables: HashMap<DraggableId, DraggableEntry>,
    droppables: HashMap<DroppableId, DroppableEntry>,
    generation: u64,
}

impl Registry {
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(super) fn len(&self) -> (usize, usize) {
        (self.draggables.len(), self.droppables.len())
    }

    /// Register `descriptor`, replacing any entry with the same id.
    pub(super) fn insert_draggable(
        &mut self,
        descriptor: DraggableDescriptor,
        source: Rc<dyn DraggableSource>,
    ) -> DraggableRegistration {
        let generation = self.next_generation();
        self.draggables.insert(
            descriptor.id.clone(),
            DraggableEntry {
                descriptor: descriptor.clone(),
                source,
                generation,
            },
        );
        Registration {
            descriptor,
            generation,
        }
    }

    /// Register `descriptor`, replacing any entry with the same id.
    pub(super) fn insert_droppable(
        &mut self,
        descriptor: DroppableDescriptor,
        source: Rc<dyn DroppableSource>,
    ) -> DroppableRegistration {
        let generation = self.next_generation();
        self.droppables.insert(
            descriptor.id.clone(),
            DroppableEntry {
                descriptor: descriptor.clone(),
                source,
                generation,
            },
        );
        Registration {
            descriptor,
            generation,
        }
    }

    pub(super) fn draggable(&self, id: &DraggableId) -> Option<&DraggableEntry> {
        self.draggables.get(id)
    }

    pub(super) fn droppable(&self, id: &DroppableId) -> Option<&DroppableEntry> {
        self.droppables.get(id)
    }

    /// `Ok(true)` when `registration` is the live entry for its id, `Ok(false)`
    /// when it has been overwritten since.
    pub(super) fn is_current_draggable(&self, registration: &DraggableRegistration) -> Result<bool> {
        let id = &registration.descriptor.id;
        let entry = self
            .draggables
            .get(id)
            .ok_or_else(|| MarshalError::UnknownDraggable(id.clone()))?;
        Ok(entry.generation == registration.generation)
    }

    /// `Ok(true)` when `registration` is the live entry for its id, `Ok(false)`
    /// when it has been overwritten since.
    pub(super) fn is_current_droppable(&self, registration: &DroppableRegistration) -> Result<bool> {
        let id = &registration.descriptor.id;
        let entry = self
            .droppables
            .get(id)
            .ok_or_else(|| MarshalError::UnknownDroppable(id.clone()))?;
        Ok(entry.generation == registration.generation)
    }

    pub(super) fn remove_draggable(&mut self, id: &DraggableId) -> Option<DraggableEntry> {
        self.draggables.remove(id)
    }

    pub(super) fn remove_droppable(&mut self, id: &DroppableId) -> Option<DroppableEntry> {
        self.droppables.remove(id)
    }

    /// Whether the droppable `id` is registered with type `kind`.
    pub(super) fn is_droppable_of_kind(&self, id: &DroppableId, kind: &DroppableType) -> bool {
        self.droppables
            .get(id)
            .is_some_and(|entry| &entry.descriptor.kind == kind)
    }

    /// Droppables of type `kind`, ordered by id.
    pub(super) fn droppables_of_kind(&self, kind: &DroppableType) -> Vec<&DroppableEntry> {
        let mut entries: Vec<_> = self
            .droppables
            .values()
            .filter(|entry| &entry.descriptor.kind == kind)
            .collect();
        entries.sort_by(|a, b| a.descriptor.id.cmp(&b.descriptor.id));
        entries
    }

    /// Draggables whose home droppable has type `kind`, ordered by home id,
    /// then index, then id.
    pub(super) fn draggables_of_kind(&self, kind: &DroppableType) -> Vec<&DraggableEntry> {
        let mut entries: Vec<_> = self
            .draggables
            .values()
            .filter(|entry| self.is_droppable_of_kind(&entry.descriptor.droppable_id, kind))
            .collect();
        entries.sort_by(|a, b| {
            let (a, b) = (&a.descriptor, &b.descriptor);
            a.droppable_id
                .cmp(&b.droppable_id)
                .then(a.index.cmp(&b.index))
                .then_with(|| a.id.cmp(&b.id))
        });
        entries
    }
}

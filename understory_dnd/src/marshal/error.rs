// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::dimension::{DraggableId, DroppableId};

/// Protocol violations reported by the [`Marshal`](super::Marshal).
///
/// These indicate that the host broke the drag protocol. The usual response is
/// to cancel the drag in one place rather than handle each case.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    /// `start_publishing` was called while a drag is already collecting.
    #[error("cannot start a collection while one is already in progress")]
    AlreadyCollecting,
    /// `collect` was called before `start_publishing`.
    #[error("cannot collect dimensions before the critical dimensions are published")]
    NoCriticalDimensions,
    /// No draggable is registered under this id.
    #[error("no draggable is registered with id `{0}`")]
    UnknownDraggable(DraggableId),
    /// No droppable is registered under this id.
    #[error("no droppable is registered with id `{0}`")]
    UnknownDroppable(DroppableId),
    /// The dragged item's home droppable is not registered.
    #[error("draggable `{draggable}` belongs to droppable `{droppable}`, which is not registered")]
    MissingHome {
        /// The dragged item.
        draggable: DraggableId,
        /// The home droppable it names.
        droppable: DroppableId,
    },
    /// The dragged item was re-registered, updated or unregistered mid-drag.
    #[error("the dragged item `{0}` cannot be changed or removed during a drag")]
    CriticalMutation(DraggableId),
    /// A droppable was registered, updated or unregistered mid-drag.
    #[error("droppable `{0}` cannot be registered, updated or unregistered during a drag")]
    DroppableChangeDuringDrag(DroppableId),
}

/// Result type for marshal operations.
pub type Result<T, E = MarshalError> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::MarshalError;

    #[test]
    fn messages_name_the_offending_id() {
        let err = MarshalError::MissingHome {
            draggable: "card".into(),
            droppable: "column".into(),
        };
        assert_eq!(
            err.to_string(),
            "draggable `card` belongs to droppable `column`, which is not registered"
        );
        assert_eq!(
            MarshalError::CriticalMutation("card".into()).to_string(),
            "the dragged item `card` cannot be changed or removed during a drag"
        );
    }
}

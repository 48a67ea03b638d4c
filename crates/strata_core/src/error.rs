//! # Buffer Error Types
//!
//! All errors that can occur while attaching, accessing or reinterpreting
//! buffer components.

use crate::ecs::EntityId;
use thiserror::Error;

/// Errors that can occur in buffer storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The target entity is not alive.
    ///
    /// Only reported when validation is enabled.
    #[error("entity {entity:?} is not alive")]
    DestroyedEntity {
        /// The dead entity.
        entity: EntityId,
    },

    /// The entity already owns a buffer of this component type.
    ///
    /// Only reported when validation is enabled.
    #[error("entity {entity:?} already owns component {component}")]
    DuplicateComponent {
        /// The entity that already owns the buffer.
        entity: EntityId,
        /// Component type ID.
        component: u8,
    },

    /// The entity does not own a buffer of this component type.
    #[error("entity {entity:?} has no component {component}")]
    MissingComponent {
        /// The entity that was looked up.
        entity: EntityId,
        /// Component type ID.
        component: u8,
    },

    /// Tried to view a buffer as an element type of a different size.
    #[error("cannot reinterpret {from}-byte elements as {to}-byte elements")]
    IncompatibleReinterpret {
        /// Size of the current element type in bytes.
        from: usize,
        /// Size of the requested element type in bytes.
        to: usize,
    },

    /// Invalid storage configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The storage layout broke one of its invariants.
    #[error("layout violation: {0}")]
    LayoutViolation(String),
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

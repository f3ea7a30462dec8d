//! Error types surfaced by the world, its queries and its storage.

use thiserror::Error;

use crate::ecs::{component, entity::Entity};

/// Failures that callers can recover from: lookups that miss and registrations that do not fit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    #[error("component type `{name}` is not registered in this world")]
    UnregisteredComponent { name: &'static str },

    #[error("cannot register component `{name}`: the world holds at most {capacity} component types")]
    ComponentCapacity { name: &'static str, capacity: usize },

    #[error("resource `{name}` is not present in this world")]
    ResourceNotFound { name: &'static str },

    #[error("entity {entity:?} is not captured by query `{query}`")]
    NotInQuery { entity: Entity, query: &'static str },

    #[error("query `{query}` has not been created, request it with `World::query` first")]
    QueryNotCreated { query: &'static str },

    #[error("entity pool exhausted, at most {capacity} entities may be reserved")]
    EntityPoolExhausted { capacity: u32 },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Violated preconditions of the archetype and column write paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("row {row} is not allocated (length {len})")]
    RowNotAllocated { row: usize, len: usize },

    #[error("no archetype has index {index}")]
    UnknownArchetype { index: usize },

    #[error("no column stores component {component:?}")]
    MissingColumn { component: component::Id },

    #[error("column for component {component:?} holds `{expected}` values")]
    TypeMismatch {
        component: component::Id,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_convert_into_ecs_errors() {
        // Given
        let storage = StorageError::RowNotAllocated { row: 3, len: 1 };

        // When
        let error: EcsError = storage.clone().into();

        // Then
        assert_eq!(error, EcsError::Storage(storage));
        assert_eq!(error.to_string(), "row 3 is not allocated (length 1)");
    }

    #[test]
    fn messages_name_the_type() {
        // Given
        let error = EcsError::UnregisteredComponent { name: "Position" };

        // Then
        assert!(error.to_string().contains("`Position`"));
    }
}

use std::{
    any::{TypeId, type_name},
    collections::HashMap,
};

use log::debug;

use crate::ecs::{
    component::{Component, Id, Set, Signature},
    error::EcsError,
    storage::{Column, TypedColumn},
};

/// Metadata recorded for a registered component type, including the factory used to build an
/// empty column of that type whenever a new archetype needs one.
#[derive(Debug, Clone, Copy)]
pub struct Info {
    id: Id,
    name: &'static str,
    type_id: TypeId,
    new_column: fn(Id) -> Box<dyn Column>,
}

impl Info {
    fn new<C: Component>(id: Id) -> Self {
        Self {
            id,
            name: type_name::<C>(),
            type_id: TypeId::of::<C>(),
            new_column: TypedColumn::<C>::boxed,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Construct an empty column for this component.
    #[inline]
    pub fn new_column(&self) -> Box<dyn Column> {
        (self.new_column)(self.id)
    }
}

/// The component registry of a single world.
///
/// Ids are assigned in registration order and never change. The registry is bounded by the world's
/// signature width; registering past it fails instead of silently growing signatures.
#[derive(Debug)]
pub struct Registry {
    /// Map from Rust type to component id.
    type_map: HashMap<TypeId, Id>,

    /// Registered components, indexed by id.
    components: Vec<Info>,

    /// Maximum number of component types, the width of every signature.
    capacity: usize,
}

impl Registry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            type_map: HashMap::new(),
            components: Vec::new(),
            capacity,
        }
    }

    /// Register component type `C` and get its id. Registering a type twice returns the id from
    /// the first registration.
    pub fn register<C: Component>(&mut self) -> Result<Id, EcsError> {
        let type_id = TypeId::of::<C>();
        if let Some(id) = self.type_map.get(&type_id) {
            return Ok(*id);
        }

        if self.components.len() >= self.capacity {
            return Err(EcsError::ComponentCapacity {
                name: type_name::<C>(),
                capacity: self.capacity,
            });
        }

        let id = Id::from(self.components.len());
        self.components.push(Info::new::<C>(id));
        self.type_map.insert(type_id, id);
        debug!("registered component `{}` as {:?}", type_name::<C>(), id);
        Ok(id)
    }

    /// Register every component in the set `S`.
    #[inline]
    pub fn register_set<S: Set>(&mut self) -> Result<(), EcsError> {
        S::register(self)
    }

    /// Get the id of a registered component type.
    #[inline]
    pub fn id<C: Component>(&self) -> Result<Id, EcsError> {
        self.type_map
            .get(&TypeId::of::<C>())
            .copied()
            .ok_or(EcsError::UnregisteredComponent {
                name: type_name::<C>(),
            })
    }

    #[inline]
    pub fn info(&self, id: Id) -> Option<&Info> {
        self.components.get(id.index())
    }

    /// Build a signature with the bits of every component in `S` set.
    pub fn signature<S: Set>(&self) -> Result<Signature, EcsError> {
        let mut ids = Vec::new();
        S::ids(self, &mut ids)?;
        Ok(Signature::from_ids(self.capacity, ids))
    }

    /// An empty signature of this registry's width.
    #[inline]
    pub fn empty_signature(&self) -> Signature {
        Signature::new(self.capacity)
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::Component;

    use super::*;

    #[derive(Component, Clone, Debug)]
    struct Position;

    #[derive(Component, Clone, Debug)]
    struct Velocity;

    #[derive(Component, Clone, Debug)]
    struct Health;

    #[test]
    fn component_registration() {
        // Given
        let mut registry = Registry::with_capacity(32);

        // When
        let pos_id = registry.register::<Position>().unwrap();
        let vel_id = registry.register::<Velocity>().unwrap();

        // Then - Ids follow registration order
        assert_eq!(pos_id, Id::new(0));
        assert_eq!(vel_id, Id::new(1));
        assert_eq!(registry.len(), 2);

        // Then - Registering the same type again should result in the same id
        assert_eq!(registry.register::<Position>().unwrap(), pos_id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregistered_lookup_is_an_error() {
        // Given
        let mut registry = Registry::with_capacity(32);
        registry.register::<Position>().unwrap();

        // When
        let result = registry.id::<Health>();

        // Then
        assert!(matches!(
            result,
            Err(EcsError::UnregisteredComponent { name }) if name.ends_with("Health")
        ));
    }

    #[test]
    fn registration_is_bounded_by_capacity() {
        // Given
        let mut registry = Registry::with_capacity(2);
        registry.register::<Position>().unwrap();
        registry.register::<Velocity>().unwrap();

        // When
        let result = registry.register::<Health>();

        // Then
        assert!(matches!(
            result,
            Err(EcsError::ComponentCapacity { capacity: 2, .. })
        ));
        assert!(registry.id::<Health>().is_err());
    }

    #[test]
    fn register_set_and_signature() {
        // Given
        let mut registry = Registry::with_capacity(32);

        // When
        registry.register_set::<(Position, Velocity, Health)>().unwrap();
        let signature = registry.signature::<(Health, Position)>().unwrap();

        // Then
        assert_eq!(signature.ids().collect::<Vec<_>>(), vec![Id::new(0), Id::new(2)]);
        assert_eq!(signature.width(), 32);
    }

    #[test]
    fn info_builds_typed_columns() {
        // Given
        let mut registry = Registry::with_capacity(32);
        let id = registry.register::<Velocity>().unwrap();

        // When
        let info = *registry.info(id).unwrap();
        let column = info.new_column();

        // Then
        assert_eq!(info.type_id(), TypeId::of::<Velocity>());
        assert!(info.name().ends_with("Velocity"));
        assert_eq!(column.component_id(), id);
        assert_eq!(column.len(), 0);
    }
}

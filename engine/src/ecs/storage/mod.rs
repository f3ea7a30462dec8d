//! Columnar component storage.
//!
//! [`Storage`] owns every [`Archetype`] of a world and the location of every live entity. Entities
//! with exactly the same component set share an archetype, one row each:
//!
//! ```text
//! Archetype {Position, Velocity}
//!   entities: [E0, E5, E2]
//!   Position: [P0, P5, P2]
//!   Velocity: [V0, V5, V2]
//!
//! Archetype {Position}
//!   entities: [E1]
//!   Position: [P1]
//! ```
//!
//! Adding or removing a component moves the entity's row into the archetype for its new signature.
//! Archetypes are created on first use and kept for the world's lifetime, even when empty.

pub mod archetype;
mod column;
mod location;
mod row;

use std::collections::HashMap;

use log::debug;

pub use archetype::Archetype;
pub use column::{Column, TypedColumn};
pub use location::Location;
pub use row::Row;

use crate::ecs::{
    component::{self, Signature},
    entity::Entity,
    error::{EcsError, StorageError},
};

#[derive(Debug, Default)]
pub(crate) struct Storage {
    /// Every archetype ever created, indexed by archetype id.
    archetypes: Vec<Archetype>,

    /// Archetype lookup by exact signature.
    by_signature: HashMap<Signature, archetype::Id>,

    /// Location of each live entity, indexed by entity id.
    locations: Vec<Option<(Entity, Location)>>,

    /// Number of live entities.
    live: usize,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    #[inline]
    pub fn archetype(&self, id: archetype::Id) -> Option<&Archetype> {
        self.archetypes.get(id.index())
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Get the archetype for `signature`, creating it if this is the first request.
    pub fn get_or_create(
        &mut self,
        signature: &Signature,
        registry: &component::Registry,
    ) -> Result<archetype::Id, EcsError> {
        if let Some(id) = self.by_signature.get(signature) {
            return Ok(*id);
        }

        let columns = signature
            .ids()
            .map(|component| {
                registry
                    .info(component)
                    .map(component::Info::new_column)
                    .ok_or(StorageError::MissingColumn { component })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = archetype::Id::new(self.archetypes.len() as u32);
        self.archetypes
            .push(Archetype::new(id, signature.clone(), columns));
        self.by_signature.insert(signature.clone(), id);
        debug!("created archetype {:?} for signature {:?}", id, signature);
        Ok(id)
    }

    /// Location of `entity`, if it is live. Stale handles to a recycled id have no location.
    #[inline]
    pub fn location(&self, entity: Entity) -> Option<Location> {
        match self.locations.get(entity.index()) {
            Some(Some((current, location))) if *current == entity => Some(*location),
            _ => None,
        }
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.location(entity).is_some()
    }

    /// The signature of a live entity.
    pub fn signature_of(&self, entity: Entity) -> Option<&Signature> {
        let location = self.location(entity)?;
        self.archetype(location.archetype_id())
            .map(Archetype::signature)
    }

    /// Typed read of one component of a live entity.
    pub fn get<C: component::Component>(
        &self,
        entity: Entity,
        component: component::Id,
    ) -> Option<&C> {
        let location = self.location(entity)?;
        self.archetype(location.archetype_id())?
            .get::<C>(component, location.row())
    }

    /// Give a newly spawned entity an uninitialized row in `target`.
    pub fn spawn_at(&mut self, entity: Entity, target: archetype::Id) -> Result<Row, StorageError> {
        let row = self.archetype_mut(target)?.allocate_entity(entity);
        self.set_location(entity, Location::new(target, row));
        self.live += 1;
        Ok(row)
    }

    /// Move a live entity from its current archetype into `target`.
    pub fn migrate(
        &mut self,
        entity: Entity,
        from: Location,
        target: archetype::Id,
    ) -> Result<Row, StorageError> {
        let (source, destination) = self.pair_mut(from.archetype_id(), target)?;
        let (row, moved) = source.request_transfer(from.row(), destination)?;
        if let Some(moved) = moved {
            self.set_location(moved, Location::new(from.archetype_id(), from.row()));
        }
        self.set_location(entity, Location::new(target, row));
        Ok(row)
    }

    /// Write a component value into an allocated row of `target`.
    #[inline]
    pub fn write(
        &mut self,
        target: archetype::Id,
        row: Row,
        component: component::Id,
        value: Box<dyn std::any::Any>,
    ) -> Result<(), StorageError> {
        self.archetype_mut(target)?
            .transfer_component(component, row, value)
    }

    /// Remove a live entity and its components. Returns `false` if the entity was not live.
    pub fn despawn(&mut self, entity: Entity) -> Result<bool, StorageError> {
        let Some(location) = self.location(entity) else {
            return Ok(false);
        };

        let moved = self
            .archetype_mut(location.archetype_id())?
            .remove_entity(location.row())?;
        if let Some(moved) = moved {
            self.set_location(moved, location);
        }
        self.locations[entity.index()] = None;
        self.live -= 1;
        Ok(true)
    }

    fn archetype_mut(&mut self, id: archetype::Id) -> Result<&mut Archetype, StorageError> {
        self.archetypes
            .get_mut(id.index())
            .ok_or(StorageError::UnknownArchetype { index: id.index() })
    }

    /// Borrow two distinct archetypes mutably at once.
    fn pair_mut(
        &mut self,
        a: archetype::Id,
        b: archetype::Id,
    ) -> Result<(&mut Archetype, &mut Archetype), StorageError> {
        for id in [a, b] {
            if id.index() >= self.archetypes.len() {
                return Err(StorageError::UnknownArchetype { index: id.index() });
            }
        }
        assert_ne!(a, b, "an archetype cannot transfer rows to itself");

        if a.index() < b.index() {
            let (head, tail) = self.archetypes.split_at_mut(b.index());
            Ok((&mut head[a.index()], &mut tail[0]))
        } else {
            let (head, tail) = self.archetypes.split_at_mut(a.index());
            Ok((&mut tail[0], &mut head[b.index()]))
        }
    }

    fn set_location(&mut self, entity: Entity, location: Location) {
        let index = entity.index();
        if index >= self.locations.len() {
            self.locations.resize(index + 1, None);
        }
        self.locations[index] = Some((entity, location));
    }
}

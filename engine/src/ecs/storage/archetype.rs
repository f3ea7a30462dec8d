//! Archetypes: the rows of every entity sharing one exact signature.

use std::collections::HashMap;

use crate::ecs::{
    component::{self, Signature},
    entity::Entity,
    error::StorageError,
    storage::{Column, Row, TypedColumn},
};

/// Archetype identifier, the archetype's index in the world's storage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Columnar storage for every entity with one exact signature.
///
/// Row `i` of every column and `entities()[i]` describe the same entity. All columns always have
/// the same length as the entity list. Removal swaps the last row into the hole, so the entity
/// that moved is reported back to the caller, which owns the entity locations.
pub struct Archetype {
    id: Id,
    signature: Signature,
    entities: Vec<Entity>,
    columns: Vec<Box<dyn Column>>,
    column_index: HashMap<component::Id, usize>,
}

impl Archetype {
    /// Build an archetype from one empty column per component of `signature`.
    pub(crate) fn new(id: Id, signature: Signature, columns: Vec<Box<dyn Column>>) -> Self {
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.component_id(), index))
            .collect();
        Self {
            id,
            signature,
            entities: Vec::new(),
            columns,
            column_index,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn entity(&self, row: Row) -> Option<Entity> {
        self.entities.get(row.index()).copied()
    }

    #[inline]
    pub fn has_component(&self, component: component::Id) -> bool {
        self.column_index.contains_key(&component)
    }

    /// Typed read of one component. `None` if this archetype has no such component or the row
    /// holds no value.
    pub fn get<C: component::Component>(&self, component: component::Id, row: Row) -> Option<&C> {
        self.column(component)?
            .as_any()
            .downcast_ref::<TypedColumn<C>>()?
            .get(row)
    }

    #[inline]
    fn column(&self, component: component::Id) -> Option<&dyn Column> {
        self.column_index
            .get(&component)
            .map(|&index| self.columns[index].as_ref())
    }

    /// Add an uninitialized row for `entity` and return it.
    ///
    /// # Panics
    ///
    /// Panics if a column's length disagrees with the entity count, which means storage is
    /// corrupted.
    pub(crate) fn allocate_entity(&mut self, entity: Entity) -> Row {
        let row = Row::new(self.entities.len());
        for column in self.columns.iter_mut() {
            assert_eq!(
                column.len(),
                row.index(),
                "archetype {:?}: column for component {:?} has {} rows but {} entities",
                self.id,
                column.component_id(),
                column.len(),
                row.index(),
            );
            column.push();
        }
        self.entities.push(entity);
        row
    }

    /// Move the entity at `row` into `target`. Components present in both archetypes are moved,
    /// components only this archetype holds are dropped, and components only the target holds are
    /// left uninitialized for the caller to write.
    ///
    /// Returns the entity's row in `target`, and the entity that was swapped into `row` here if
    /// there was one.
    pub(crate) fn request_transfer(
        &mut self,
        row: Row,
        target: &mut Archetype,
    ) -> Result<(Row, Option<Entity>), StorageError> {
        let entity = self.entity(row).ok_or(StorageError::RowNotAllocated {
            row: row.index(),
            len: self.len(),
        })?;

        let target_row = target.allocate_entity(entity);
        for column in self.columns.iter_mut() {
            if let Some(&index) = target.column_index.get(&column.component_id()) {
                column.move_to(row, target.columns[index].as_mut(), target_row)?;
            }
        }

        let moved = self.remove_entity(row)?;
        Ok((target_row, moved))
    }

    /// Write a component value into an allocated row.
    pub(crate) fn transfer_component(
        &mut self,
        component: component::Id,
        row: Row,
        value: Box<dyn std::any::Any>,
    ) -> Result<(), StorageError> {
        if row.index() >= self.entities.len() {
            return Err(StorageError::RowNotAllocated {
                row: row.index(),
                len: self.entities.len(),
            });
        }
        let index = *self
            .column_index
            .get(&component)
            .ok_or(StorageError::MissingColumn { component })?;
        self.columns[index].set(row, value)
    }

    /// Remove the entity at `row`, dropping its components. Returns the entity that now occupies
    /// `row`, if any.
    pub(crate) fn remove_entity(&mut self, row: Row) -> Result<Option<Entity>, StorageError> {
        let index = row.index();
        if index >= self.entities.len() {
            return Err(StorageError::RowNotAllocated {
                row: index,
                len: self.entities.len(),
            });
        }

        let last = self.entities.len() - 1;
        self.entities.swap_remove(index);
        for column in self.columns.iter_mut() {
            column.swap_remove(row)?;
        }

        #[cfg(debug_assertions)]
        self.verify_invariants();

        Ok((index != last).then(|| self.entities[index]))
    }

    #[cfg(debug_assertions)]
    fn verify_invariants(&self) {
        for column in self.columns.iter() {
            assert_eq!(
                column.len(),
                self.entities.len(),
                "archetype {:?}: column for component {:?} out of step with its entities",
                self.id,
                column.component_id(),
            );
        }
    }
}

impl std::fmt::Debug for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archetype")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .field("entities", &self.entities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::Component;

    use super::*;

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Pos(f32, f32);

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Vel(f32);

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Hp(u32);

    const POSITION: component::Id = component::Id::new(0);
    const VELOCITY: component::Id = component::Id::new(1);
    const HEALTH: component::Id = component::Id::new(2);

    fn archetype(id: u32, components: &[component::Id]) -> Archetype {
        let columns = components
            .iter()
            .map(|&component| match component.index() {
                0 => TypedColumn::<Pos>::boxed(component),
                1 => TypedColumn::<Vel>::boxed(component),
                _ => TypedColumn::<Hp>::boxed(component),
            })
            .collect();
        Archetype::new(
            Id::new(id),
            Signature::from_ids(8, components.iter().copied()),
            columns,
        )
    }

    fn spawn(archetype: &mut Archetype, entity: u32, position: (f32, f32), velocity: f32) -> Row {
        let row = archetype.allocate_entity(Entity::new(entity));
        archetype
            .transfer_component(POSITION, row, Box::new(Pos(position.0, position.1)))
            .unwrap();
        archetype
            .transfer_component(VELOCITY, row, Box::new(Vel(velocity)))
            .unwrap();
        row
    }

    #[test]
    fn allocate_entity_grows_every_column() {
        // Given
        let mut archetype = archetype(0, &[POSITION, VELOCITY]);

        // When
        let first = archetype.allocate_entity(Entity::new(4));
        let second = archetype.allocate_entity(Entity::new(9));

        // Then
        assert_eq!(first, Row::new(0));
        assert_eq!(second, Row::new(1));
        assert_eq!(archetype.entities(), &[Entity::new(4), Entity::new(9)]);
        assert_eq!(archetype.get::<Vel>(VELOCITY, second), None);
    }

    #[test]
    fn empty_signature_still_tracks_rows() {
        // Given
        let mut archetype = archetype(0, &[]);

        // When
        archetype.allocate_entity(Entity::new(0));
        archetype.allocate_entity(Entity::new(1));
        let moved = archetype.remove_entity(Row::new(0)).unwrap();

        // Then
        assert_eq!(moved, Some(Entity::new(1)));
        assert_eq!(archetype.len(), 1);
    }

    #[test]
    fn transfer_component_checks_preconditions() {
        // Given
        let mut archetype = archetype(0, &[POSITION]);
        let row = archetype.allocate_entity(Entity::new(0));

        // When
        let unallocated = archetype.transfer_component(POSITION, Row::new(1), Box::new(Pos(1.0, 1.0)));
        let missing = archetype.transfer_component(HEALTH, row, Box::new(Hp(5)));
        let wrong_type = archetype.transfer_component(POSITION, row, Box::new(Hp(5)));

        // Then
        assert_eq!(
            unallocated,
            Err(StorageError::RowNotAllocated { row: 1, len: 1 })
        );
        assert_eq!(
            missing,
            Err(StorageError::MissingColumn { component: HEALTH })
        );
        assert!(matches!(wrong_type, Err(StorageError::TypeMismatch { .. })));
    }

    #[test]
    fn remove_entity_reports_swapped_entity() {
        // Given
        let mut archetype = archetype(0, &[POSITION, VELOCITY]);
        spawn(&mut archetype, 0, (0.0, 0.0), 0.5);
        spawn(&mut archetype, 1, (1.0, 1.0), 1.5);
        spawn(&mut archetype, 2, (2.0, 2.0), 2.5);

        // When
        let moved = archetype.remove_entity(Row::new(0)).unwrap();

        // Then - The last entity now lives in row 0 with its own data
        assert_eq!(moved, Some(Entity::new(2)));
        assert_eq!(archetype.entity(Row::new(0)), Some(Entity::new(2)));
        assert_eq!(archetype.get::<Pos>(POSITION, Row::new(0)), Some(&Pos(2.0, 2.0)));
        assert_eq!(archetype.get::<Vel>(VELOCITY, Row::new(0)), Some(&Vel(2.5)));

        // When - Removing the last row moves nothing
        let moved = archetype.remove_entity(Row::new(1)).unwrap();

        // Then
        assert_eq!(moved, None);
        assert_eq!(archetype.len(), 1);
    }

    #[test]
    fn request_transfer_moves_shared_components() {
        // Given
        let mut source = archetype(0, &[POSITION, VELOCITY]);
        let mut target = archetype(1, &[POSITION, HEALTH]);
        spawn(&mut source, 0, (3.0, 4.0), 9.0);
        spawn(&mut source, 1, (5.0, 6.0), 1.0);

        // When
        let (row, moved) = source.request_transfer(Row::new(0), &mut target).unwrap();

        // Then - Position moved, velocity dropped, health awaits a value
        assert_eq!(row, Row::new(0));
        assert_eq!(moved, Some(Entity::new(1)));
        assert_eq!(target.entities(), &[Entity::new(0)]);
        assert_eq!(target.get::<Pos>(POSITION, row), Some(&Pos(3.0, 4.0)));
        assert_eq!(target.get::<Hp>(HEALTH, row), None);
        assert_eq!(source.entities(), &[Entity::new(1)]);
        assert_eq!(source.get::<Pos>(POSITION, Row::new(0)), Some(&Pos(5.0, 6.0)));
    }

    #[test]
    fn request_transfer_of_unallocated_row_fails() {
        // Given
        let mut source = archetype(0, &[POSITION]);
        let mut target = archetype(1, &[]);

        // When
        let result = source.request_transfer(Row::new(0), &mut target);

        // Then
        assert_eq!(
            result,
            Err(StorageError::RowNotAllocated { row: 0, len: 0 })
        );
        assert!(target.is_empty());
    }

    #[test]
    #[should_panic(expected = "has 0 rows but 1 entities")]
    fn allocate_entity_panics_on_corrupt_columns() {
        // Given
        let mut archetype = archetype(0, &[POSITION]);
        archetype.allocate_entity(Entity::new(0));
        archetype.columns[0].pop();

        // When
        archetype.allocate_entity(Entity::new(1));
    }
}

//! Cached, incrementally maintained queries.
//!
//! A [`Query<F, D>`] is a live view of every entity whose signature holds the components that
//! `D` requires and satisfies filter `F`. It keeps one row of [`Data`] per matching entity:
//!
//! ```rust,ignore
//! let moving = world.query::<Without<Frozen>, (Entity, Position, Velocity)>()?;
//! for (entity, position, velocity) in moving {
//!     // ...
//! }
//! ```
//!
//! The world builds each distinct query once, scanning the existing archetypes, and afterwards
//! refreshes it as edits are applied at the end of every tick. Rows are snapshots: they reflect
//! the world as of the last tick boundary and are not changed by queued commands.

mod data;
mod filter;

use std::{any::type_name, collections::HashMap, fmt};

use log::{trace, warn};

pub use data::{Data, Has, Maybe};
pub use filter::{All, Any, Filter, FilterSet, One, With, Without};

use crate::ecs::{
    component::{self, Signature},
    entity::Entity,
    error::EcsError,
    storage::{Archetype, Row, Storage},
};

/// The narrow interface the world uses to keep every cached query current.
pub(crate) trait QueryCache: std::any::Any {
    /// An entity's edit was applied; `current` is its signature after the edit.
    fn entity_updated(
        &mut self,
        entity: Entity,
        previous: &Signature,
        current: &Signature,
        storage: &Storage,
    );

    /// An entity was despawned.
    fn entity_deleted(&mut self, entity: Entity);

    fn as_any(&self) -> &dyn std::any::Any;
}

/// A cached view over every entity matching filter `F` that holds the data `D` requires.
pub struct Query<F: Filter, D: Data> {
    /// Components `D` requires.
    signature: Signature,
    filter: F,
    state: D::State,

    /// Dense rows, parallel to `entities`.
    rows: Vec<D::Output>,
    entities: Vec<Entity>,

    /// Position of each captured entity in `rows`.
    index: HashMap<Entity, usize>,
}

impl<F: Filter, D: Data> Query<F, D> {
    /// Build the query and capture every existing entity that matches.
    pub(crate) fn new(registry: &component::Registry, storage: &Storage) -> Result<Self, EcsError> {
        let mut signature = registry.empty_signature();
        let state = D::init(registry, &mut signature)?;
        let filter = F::build(registry)?;

        let mut query = Self {
            signature,
            filter,
            state,
            rows: Vec::new(),
            entities: Vec::new(),
            index: HashMap::new(),
        };

        for archetype in storage.archetypes() {
            if !query.matches(archetype.signature()) {
                continue;
            }
            for (row, &entity) in archetype.entities().iter().enumerate() {
                query.capture(entity, archetype, Row::new(row));
            }
        }
        Ok(query)
    }

    /// Number of captured entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `entity` is currently captured.
    #[inline]
    pub fn captured(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// The row of one captured entity.
    pub fn get(&self, entity: Entity) -> Result<&D::Output, EcsError> {
        self.index
            .get(&entity)
            .map(|&index| &self.rows[index])
            .ok_or(EcsError::NotInQuery {
                entity,
                query: type_name::<Self>(),
            })
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, D::Output> {
        self.rows.iter()
    }

    /// Rows paired with the entity they describe.
    pub fn iter_with_entities(&self) -> impl Iterator<Item = (Entity, &D::Output)> + '_ {
        self.entities.iter().copied().zip(self.rows.iter())
    }

    /// Captured entities, in row order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Components an entity must hold to be captured.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Whether an entity with `signature` belongs in this query.
    #[inline]
    pub fn matches(&self, signature: &Signature) -> bool {
        signature.contains_all(&self.signature) && self.filter.fetch(signature)
    }

    /// Fetch the entity's row and insert or refresh it.
    fn capture(&mut self, entity: Entity, archetype: &Archetype, row: Row) {
        let Some(data) = D::fetch(&self.state, entity, archetype, row) else {
            warn!(
                "entity {:?} matches `{}` but holds uninitialized data, skipping",
                entity,
                type_name::<Self>()
            );
            self.remove(entity);
            return;
        };

        match self.index.get(&entity) {
            Some(&index) => self.rows[index] = data,
            None => {
                self.index.insert(entity, self.rows.len());
                self.rows.push(data);
                self.entities.push(entity);
            }
        }
    }

    /// Swap-remove the entity's row and fix the index of the row moved into its place.
    fn remove(&mut self, entity: Entity) {
        let Some(index) = self.index.remove(&entity) else {
            return;
        };
        self.rows.swap_remove(index);
        self.entities.swap_remove(index);
        if let Some(&moved) = self.entities.get(index) {
            self.index.insert(moved, index);
        }
    }
}

impl<F: Filter, D: Data> QueryCache for Query<F, D> {
    fn entity_updated(
        &mut self,
        entity: Entity,
        previous: &Signature,
        current: &Signature,
        storage: &Storage,
    ) {
        if !self.matches(current) {
            if self.captured(entity) {
                trace!("{:?} left query ({:?} -> {:?})", entity, previous, current);
                self.remove(entity);
            }
            return;
        }

        let location = storage
            .location(entity)
            .and_then(|location| Some((storage.archetype(location.archetype_id())?, location.row())));
        match location {
            Some((archetype, row)) => self.capture(entity, archetype, row),
            None => self.remove(entity),
        }
    }

    fn entity_deleted(&mut self, entity: Entity) {
        self.remove(entity);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl<'q, F: Filter, D: Data> IntoIterator for &'q Query<F, D> {
    type Item = &'q D::Output;
    type IntoIter = std::slice::Iter<'q, D::Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<F: Filter, D: Data> fmt::Debug for Query<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("signature", &self.signature)
            .field("entities", &self.entities)
            .finish()
    }
}

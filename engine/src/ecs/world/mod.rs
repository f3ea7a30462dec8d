//! The World is the central container for all entities, components, resources and systems.
//!
//! A `World` owns every piece of ECS state and drives it forward one [`tick`](World::tick) at a
//! time. Structural changes never happen while systems run: they are queued as commands and folded
//! into storage once every system has finished.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: Hands out entity ids and recycles them once a despawn is applied
//! - **Component Registry**: Assigns each component type a dense id and a column factory
//! - **Storage**: Keeps component data in archetypes, one per distinct component set
//! - **Query Caches**: Memoized [`Query`] views refreshed after every applied edit
//! - **Resources**: Shared singletons, one per type
//! - **Command Queue**: Deferred spawns, despawns and component changes
//!
//! # Example
//!
//! ```ignore
//! use rusty_ecs::ecs::{Commands, Entity, Query, World};
//!
//! let mut world = World::new();
//! world.register_components::<(Position, Velocity)>()?;
//!
//! world.spawn().insert((Position { x: 0.0, y: 0.0 }, Velocity { dx: 1.0, dy: 0.0 }))?;
//! world.add_system(movement)?;
//!
//! world.tick()?;
//! ```
mod edit;
mod tick;

use std::{
    any::{TypeId, type_name},
    cell::RefCell,
    collections::HashMap,
};

use log::debug;

pub use tick::{TickPhase, TickStatus};

use crate::ecs::{
    component::{self, Component, Set, Signature},
    config::WorldConfig,
    entity::{self, Entity},
    error::EcsError,
    query::{Data, Filter, Query, QueryCache},
    resource::{Res, Resource, Resources},
    storage::{Archetype, Storage},
    system::{CommandQueue, Commands, EntityCommands, IntoSystem, IntoSystems, System},
};

/// The central container for all entities, components, resources and systems.
///
/// Every change to entities goes through [`Commands`], either from inside a system or directly via
/// [`World::commands`], and becomes visible at the end of the next [`World::tick`].
pub struct World {
    /// Sizing limits fixed at construction.
    config: WorldConfig,

    /// Component type metadata.
    registry: component::Registry,

    /// Entity id pool.
    entity_allocator: entity::Allocator,

    /// Archetypes and entity locations.
    storage: Storage,

    /// Singleton values keyed by type.
    resources: Resources,

    /// Memoized queries, keyed by the `TypeId` of their `Query<F, D>` type.
    queries: HashMap<TypeId, Box<dyn QueryCache>>,

    /// Systems in the order they run. Borrowed mutably for the whole Running phase.
    systems: RefCell<Vec<System>>,

    /// Commands waiting for the end of the tick.
    command_queue: CommandQueue,

    phase: TickPhase,
    tick_count: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Construct an empty world with the default [`WorldConfig`].
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            registry: component::Registry::with_capacity(config.max_components()),
            entity_allocator: entity::Allocator::with_capacity(config.max_entities()),
            storage: Storage::new(),
            resources: Resources::default(),
            queries: HashMap::new(),
            systems: RefCell::new(Vec::new()),
            command_queue: CommandQueue::new(),
            phase: TickPhase::Idle,
            tick_count: 0,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Register every component type in `S`. Registering a type twice is a no-op.
    pub fn register_components<S: Set>(&mut self) -> Result<(), EcsError> {
        self.registry.register_set::<S>()
    }

    /// The id assigned to component `C`.
    pub fn component_id<C: Component>(&self) -> Result<component::Id, EcsError> {
        self.registry.id::<C>()
    }

    /// Queue a new entity. Shorthand for `world.commands().spawn()`.
    ///
    /// # Panics
    ///
    /// Panics if the entity pool is exhausted.
    pub fn spawn(&self) -> EntityCommands<'_> {
        self.commands().spawn()
    }

    /// Deferred write access to the world, applied at the end of the next tick.
    pub fn commands(&self) -> Commands<'_> {
        Commands::new(
            &self.command_queue,
            &self.entity_allocator,
            &self.registry,
            &self.storage,
        )
    }

    /// Number of commands waiting for the end of the tick.
    #[inline]
    pub fn pending_commands(&self) -> usize {
        self.command_queue.len()
    }

    /// The cached query for filter `F` and data `D`, built on first request from the current
    /// archetypes.
    pub fn query<F: Filter, D: Data>(&mut self) -> Result<&Query<F, D>, EcsError> {
        let key = TypeId::of::<Query<F, D>>();
        if !self.queries.contains_key(&key) {
            let query = Query::<F, D>::new(&self.registry, &self.storage)?;
            debug!(
                "created query {} with {} entities",
                type_name::<Query<F, D>>(),
                query.len()
            );
            self.queries.insert(key, Box::new(query));
        }
        self.cached_query::<F, D>()
    }

    /// A query previously built with [`World::query`].
    pub fn cached_query<F: Filter, D: Data>(&self) -> Result<&Query<F, D>, EcsError> {
        self.queries
            .get(&TypeId::of::<Query<F, D>>())
            .and_then(|cache| cache.as_any().downcast_ref::<Query<F, D>>())
            .ok_or(EcsError::QueryNotCreated {
                query: type_name::<Query<F, D>>(),
            })
    }

    /// Append a system to the end of the run order.
    pub fn add_system<M>(&mut self, system: impl IntoSystem<M>) -> Result<(), EcsError> {
        let system = system.into_system(self)?;
        debug!("added system {}", system.name());
        self.systems.get_mut().push(system);
        Ok(())
    }

    /// Append several systems, in tuple order. Nothing is added if any of them fails to prepare.
    pub fn add_systems<M>(&mut self, systems: impl IntoSystems<M>) -> Result<(), EcsError> {
        for system in systems.into_systems(self)? {
            debug!("added system {}", system.name());
            self.systems.get_mut().push(system);
        }
        Ok(())
    }

    /// Number of registered systems. Reads as zero from inside a running system.
    #[inline]
    pub fn system_count(&self) -> usize {
        self.systems.try_borrow().map_or(0, |systems| systems.len())
    }

    /// Store a resource, replacing any previous value of the same type. Handles to the previous
    /// value keep pointing at it.
    pub fn insert_resource<T: Resource>(&mut self, value: T) -> Res<T> {
        self.resources.insert(value)
    }

    pub fn resource<T: Resource>(&self) -> Result<Res<T>, EcsError> {
        self.resources.get::<T>().ok_or(EcsError::ResourceNotFound {
            name: type_name::<T>(),
        })
    }

    pub fn remove_resource<T: Resource>(&mut self) -> Option<Res<T>> {
        self.resources.remove::<T>()
    }

    #[inline]
    pub fn has_resource<T: Resource>(&self) -> bool {
        self.resources.contains::<T>()
    }

    /// Whether `entity` was spawned by an applied tick and has not been despawned since.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.storage.contains(entity)
    }

    /// The component set of a live entity.
    pub fn signature_of(&self, entity: Entity) -> Option<&Signature> {
        self.storage.signature_of(entity)
    }

    /// Read one component of a live entity as of the last tick boundary.
    pub fn get<C: Component>(&self, entity: Entity) -> Result<Option<&C>, EcsError> {
        let component = self.registry.id::<C>()?;
        Ok(self.storage.get::<C>(entity, component))
    }

    /// Number of live entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.storage.len()
    }

    pub fn archetypes(&self) -> &[Archetype] {
        self.storage.archetypes()
    }

    #[inline]
    pub fn archetype_count(&self) -> usize {
        self.storage.archetypes().len()
    }

    #[inline]
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Number of completed ticks.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::{Component, Resource};

    use super::*;
    use crate::ecs::{
        Row,
        query::{With, Without},
    };

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Position(i32, i32);

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Velocity(i32);

    #[derive(Resource, Debug, PartialEq)]
    struct Gravity(i32);

    fn noop() {}

    fn inspect(_world: &World) {}

    #[test]
    fn new_world_is_empty() {
        // Given
        let world = World::new();

        // Then
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.archetype_count(), 0);
        assert_eq!(world.pending_commands(), 0);
        assert_eq!(world.phase(), TickPhase::Idle);
        assert_eq!(world.tick_count(), 0);
        assert_eq!(world.config(), &WorldConfig::default());
    }

    #[test]
    fn register_components_assigns_ids() {
        // Given
        let mut world = World::new();

        // When
        world.register_components::<(Position, Velocity)>().unwrap();
        world.register_components::<Position>().unwrap();

        // Then
        assert_eq!(world.component_id::<Position>().unwrap().index(), 0);
        assert_eq!(world.component_id::<Velocity>().unwrap().index(), 1);
    }

    #[test]
    fn component_capacity_is_enforced() {
        // Given
        let mut world = World::with_config(WorldConfig::default().with_max_components(1));
        world.register_components::<Position>().unwrap();

        // When
        let result = world.register_components::<Velocity>();

        // Then
        assert!(matches!(
            result,
            Err(EcsError::ComponentCapacity { capacity: 1, .. })
        ));
    }

    #[test]
    fn spawn_is_deferred_until_tick() {
        // Given
        let mut world = World::new();
        world.register_components::<Position>().unwrap();

        // When
        let entity = world.spawn().insert(Position(1, 2)).unwrap().id();

        // Then
        assert!(!world.is_alive(entity));
        assert_eq!(world.pending_commands(), 2);

        // When
        world.tick().unwrap();

        // Then
        assert!(world.is_alive(entity));
        assert_eq!(world.get::<Position>(entity).unwrap(), Some(&Position(1, 2)));
        assert!(matches!(
            world.get::<Velocity>(entity),
            Err(EcsError::UnregisteredComponent { .. })
        ));
    }

    #[test]
    fn archetype_rows_are_readable() {
        // Given
        let mut world = World::new();
        world.register_components::<Position>().unwrap();
        let entity = world.spawn().insert(Position(5, 6)).unwrap().id();
        world.tick().unwrap();
        let position = world.component_id::<Position>().unwrap();

        // When
        let archetype = &world.archetypes()[0];

        // Then
        assert_eq!(archetype.entity(Row::new(0)), Some(entity));
        assert_eq!(
            archetype.get::<Position>(position, Row::new(0)),
            Some(&Position(5, 6))
        );
        assert_eq!(archetype.get::<Velocity>(position, Row::new(1)), None);
    }

    #[test]
    fn entity_pool_exhaustion_is_reported() {
        // Given
        let world = World::with_config(WorldConfig::default().with_max_entities(1));
        world.spawn();

        // When
        let result = world.commands().try_spawn();

        // Then
        assert!(matches!(
            result,
            Err(EcsError::EntityPoolExhausted { capacity: 1 })
        ));
    }

    #[test]
    fn queries_are_memoized() {
        // Given
        let mut world = World::new();
        world.register_components::<(Position, Velocity)>().unwrap();

        // When
        let first: *const Query<With<Velocity>, Position> =
            world.query::<With<Velocity>, Position>().unwrap();
        let second: *const Query<With<Velocity>, Position> =
            world.query::<With<Velocity>, Position>().unwrap();

        // Then
        assert_eq!(first, second);
        assert!(world.cached_query::<With<Velocity>, Position>().is_ok());
        assert!(matches!(
            world.cached_query::<Without<Velocity>, Position>(),
            Err(EcsError::QueryNotCreated { .. })
        ));
    }

    #[test]
    fn query_over_unregistered_component_fails() {
        // Given
        let mut world = World::new();

        // When
        let result = world.query::<(), Position>();

        // Then
        assert!(matches!(
            result,
            Err(EcsError::UnregisteredComponent { .. })
        ));
    }

    #[test]
    fn resources_round_trip() {
        // Given
        let mut world = World::new();

        // When
        let handle = world.insert_resource(Gravity(10));
        handle.borrow_mut().0 = 12;

        // Then
        assert!(world.has_resource::<Gravity>());
        assert_eq!(*world.resource::<Gravity>().unwrap().borrow(), Gravity(12));

        // When
        let removed = world.remove_resource::<Gravity>().unwrap();

        // Then
        assert!(removed.ptr_eq(&handle));
        assert!(!world.has_resource::<Gravity>());
        assert!(matches!(
            world.resource::<Gravity>(),
            Err(EcsError::ResourceNotFound { .. })
        ));
    }

    #[test]
    fn replacing_a_resource_detaches_old_handles() {
        // Given
        let mut world = World::new();
        let old = world.insert_resource(Gravity(1));

        // When
        world.insert_resource(Gravity(2));

        // Then
        assert_eq!(*old.borrow(), Gravity(1));
        assert_eq!(*world.resource::<Gravity>().unwrap().borrow(), Gravity(2));
    }

    #[test]
    fn add_systems_keeps_count() {
        // Given
        let mut world = World::new();

        // When
        world.add_system(noop).unwrap();
        world.add_systems((noop, inspect)).unwrap();

        // Then
        assert_eq!(world.system_count(), 3);
    }
}

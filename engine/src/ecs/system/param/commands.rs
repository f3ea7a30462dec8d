//! The [`Commands`] parameter: deferred structural changes.
//!
//! Everything written through `Commands` lands in the world's command queue and takes effect when
//! the current tick ends. Reads through [`EntityCommands::get`] always see the world as it was when
//! the tick started, never the queued changes.

use std::any::{Any, type_name};

use crate::ecs::{
    component::{self, Component, Set},
    entity::{self, Entity},
    error::EcsError,
    storage::Storage,
    system::{
        Parameter,
        command::{Command, CommandQueue},
    },
    world::World,
};

/// Write access to the world's command queue.
#[derive(Clone, Copy)]
pub struct Commands<'w> {
    queue: &'w CommandQueue,
    allocator: &'w entity::Allocator,
    registry: &'w component::Registry,
    storage: &'w Storage,
}

impl<'w> Commands<'w> {
    pub(crate) fn new(
        queue: &'w CommandQueue,
        allocator: &'w entity::Allocator,
        registry: &'w component::Registry,
        storage: &'w Storage,
    ) -> Self {
        Self {
            queue,
            allocator,
            registry,
            storage,
        }
    }

    /// Reserve an entity id now and queue its spawn. The entity has no components and is not
    /// visible to queries until the tick ends.
    ///
    /// # Panics
    ///
    /// Panics if the entity pool is exhausted. Use [`Commands::try_spawn`] to handle that case.
    pub fn spawn(&self) -> EntityCommands<'w> {
        match self.try_spawn() {
            Ok(entity) => entity,
            Err(error) => panic!("{error}"),
        }
    }

    /// Reserve an entity id and queue its spawn, failing if the entity pool is exhausted.
    pub fn try_spawn(&self) -> Result<EntityCommands<'w>, EcsError> {
        let entity = self
            .allocator
            .alloc()
            .ok_or(EcsError::EntityPoolExhausted {
                capacity: self.allocator.capacity(),
            })?;
        self.queue.push(Command::Spawn { entity });
        Ok(self.entity(entity))
    }

    /// Spawn an entity with an initial set of component values.
    ///
    /// Every component of the set is checked before an id is reserved, so a failed call leaves no
    /// trace in the queue.
    pub fn spawn_with<S: Set>(&self, values: S) -> Result<EntityCommands<'w>, EcsError> {
        let mut staged: Vec<(component::Id, Box<dyn Any>)> = Vec::new();
        values.apply(self.registry, &mut staged)?;
        let entity = self.try_spawn()?;
        entity.push_values(staged);
        Ok(entity)
    }

    /// Commands scoped to one entity.
    #[inline]
    pub fn entity(&self, entity: Entity) -> EntityCommands<'w> {
        EntityCommands {
            entity,
            commands: *self,
        }
    }

    /// Queue the removal of an entity and all its components.
    #[inline]
    pub fn despawn(&self, entity: Entity) {
        self.queue.push(Command::Despawn { entity });
    }
}

/// Commands for one entity.
///
/// ```rust,ignore
/// let player = commands
///     .spawn()
///     .insert((Position { x: 0.0, y: 0.0 }, Health(100)))?
///     .id();
/// ```
#[derive(Clone, Copy)]
pub struct EntityCommands<'w> {
    entity: Entity,
    commands: Commands<'w>,
}

impl<'w> EntityCommands<'w> {
    #[inline]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// Queue one or more component values. A component the entity already has is overwritten.
    ///
    /// Fails without queueing anything if a component type is not registered.
    pub fn insert<S: Set>(&self, values: S) -> Result<&Self, EcsError> {
        let mut staged: Vec<(component::Id, Box<dyn Any>)> = Vec::new();
        values.apply(self.commands.registry, &mut staged)?;
        self.push_values(staged);
        Ok(self)
    }

    /// Queue the removal of every component in `S`. Removing a component the entity does not
    /// have is a no-op.
    pub fn remove<S: Set>(&self) -> Result<&Self, EcsError> {
        let mut ids = Vec::new();
        S::ids(self.commands.registry, &mut ids)?;
        for component in ids {
            self.commands.queue.push(Command::RemoveComponent {
                entity: self.entity,
                component,
            });
        }
        Ok(self)
    }

    /// Queue the removal of this entity.
    #[inline]
    pub fn despawn(&self) {
        self.commands.despawn(self.entity);
    }

    /// Read a component as it was when the tick started. Queued inserts are not visible.
    pub fn get<C: Component>(&self) -> Result<Option<&'w C>, EcsError> {
        let component = self.commands.registry.id::<C>()?;
        Ok(self.commands.storage.get::<C>(self.entity, component))
    }

    fn push_values(&self, values: Vec<(component::Id, Box<dyn Any>)>) {
        for (component, value) in values {
            self.commands.queue.push(Command::AddComponent {
                entity: self.entity,
                component,
                value,
            });
        }
    }
}

impl std::fmt::Debug for EntityCommands<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

impl Parameter for Commands<'_> {
    type Value<'w> = Commands<'w>;

    fn prepare(_world: &mut World) -> Result<(), EcsError> {
        Ok(())
    }

    fn fetch<'w>(world: &'w World) -> Result<Self::Value<'w>, EcsError> {
        Ok(world.commands())
    }
}

//! Deferred structural commands.
//!
//! Systems never change the world's structure directly. Spawning, despawning and adding or
//! removing components are pushed onto the world's [`CommandQueue`] and applied together when the
//! tick ends:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            Tick                              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  System A ──push──┐                                          │
//! │  System B ──push──┼──► CommandQueue ──collect──► Edits       │
//! │  System C ──push──┘                               │          │
//! │                                                   ▼          │
//! │                                     apply ──► Archetypes     │
//! │                                           ──► Query caches   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pushing only needs a shared reference, so systems enqueue while the world is shared. Order is
//! preserved: the queue is read back exactly as it was written.

use std::any::Any;

use crossbeam::queue::SegQueue;

use crate::ecs::{component, entity::Entity};

/// One deferred mutation.
pub enum Command {
    /// Materialize a reserved entity. Its working component set starts empty.
    Spawn { entity: Entity },

    /// Remove an entity. Later commands for the same entity in the same tick are ignored.
    Despawn { entity: Entity },

    /// Attach (or overwrite) one component value.
    AddComponent {
        entity: Entity,
        component: component::Id,
        value: Box<dyn Any>,
    },

    /// Detach one component.
    RemoveComponent {
        entity: Entity,
        component: component::Id,
    },
}

impl Command {
    /// The entity this command targets.
    #[inline]
    pub fn entity(&self) -> Entity {
        match self {
            Command::Spawn { entity }
            | Command::Despawn { entity }
            | Command::AddComponent { entity, .. }
            | Command::RemoveComponent { entity, .. } => *entity,
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Spawn { entity } => f.debug_struct("Spawn").field("entity", entity).finish(),
            Command::Despawn { entity } => {
                f.debug_struct("Despawn").field("entity", entity).finish()
            }
            Command::AddComponent {
                entity, component, ..
            } => f
                .debug_struct("AddComponent")
                .field("entity", entity)
                .field("component", component)
                .finish_non_exhaustive(),
            Command::RemoveComponent { entity, component } => f
                .debug_struct("RemoveComponent")
                .field("entity", entity)
                .field("component", component)
                .finish(),
        }
    }
}

/// Append-only, order preserving command log.
#[derive(Default)]
pub struct CommandQueue {
    commands: SegQueue<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: SegQueue::new(),
        }
    }

    #[inline]
    pub fn push(&self, command: Command) {
        self.commands.push(command);
    }

    /// Take every queued command, oldest first.
    pub fn drain(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.commands.len());
        while let Some(command) = self.commands.pop() {
            commands.push(command);
        }
        commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

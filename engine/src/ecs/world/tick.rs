//! The tick protocol.
//!
//! A tick moves the world through four phases:
//!
//! ```text
//! Idle -> Running -> Collecting -> Applying -> Idle
//! ```
//!
//! `Running` calls every system in order against a shared borrow of the world. Systems can only
//! queue commands, so storage and queries hold still for the whole phase. `Collecting` drains the
//! command queue and folds it into one [`EntityEdit`] per entity. `Applying` writes each edit into
//! storage, refreshes every cached query and returns despawned ids to the allocator.

use log::{debug, error, trace, warn};

use super::{
    World,
    edit::{self, EntityEdit},
};
use crate::ecs::{entity::Entity, error::EcsError};

/// Where the world is in its tick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    Idle,
    Running,
    Collecting,
    Applying,
}

/// Outcome of a call to [`World::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Every phase ran.
    Completed,

    /// The world was not idle, nothing happened.
    Skipped,
}

impl World {
    /// Run every system once and then apply the commands they, or anyone else, queued.
    ///
    /// A system that fails to fetch its parameters is skipped for this tick; the remaining systems
    /// still run and the queued commands are still applied. The first such failure is returned
    /// once the tick has finished.
    ///
    /// # Panics
    ///
    /// Panics if storage is found inconsistent while edits are applied.
    pub fn tick(&mut self) -> Result<TickStatus, EcsError> {
        if self.phase != TickPhase::Idle {
            warn!("tick requested while {:?}, ignoring", self.phase);
            return Ok(TickStatus::Skipped);
        }

        self.phase = TickPhase::Running;
        trace!("tick {}: running {} systems", self.tick_count, self.system_count());
        let failure = self.run_systems();

        self.phase = TickPhase::Collecting;
        let commands = self.command_queue.drain();
        trace!("tick {}: collecting {} commands", self.tick_count, commands.len());
        let edits = edit::collect(commands, &self.storage, &self.registry);

        self.phase = TickPhase::Applying;
        trace!("tick {}: applying {} entity edits", self.tick_count, edits.len());
        for (entity, edit) in edits {
            if let Err(error) = self.apply(entity, edit) {
                panic!("world storage inconsistent while applying edits to {entity:?}: {error}");
            }
        }

        self.tick_count += 1;
        self.phase = TickPhase::Idle;
        match failure {
            Some(error) => Err(error),
            None => Ok(TickStatus::Completed),
        }
    }

    fn run_systems(&self) -> Option<EcsError> {
        let mut systems = self.systems.borrow_mut();
        let mut failure = None;
        for system in systems.iter_mut() {
            if let Err(err) = system.run(self) {
                error!("system {} skipped: {}", system.name(), err);
                failure.get_or_insert(err);
            }
        }
        failure
    }

    fn apply(&mut self, entity: Entity, edit: EntityEdit) -> Result<(), EcsError> {
        let location = self.storage.location(entity);

        if edit.despawning {
            match (location, edit.just_spawned) {
                (Some(_), _) => {
                    self.storage.despawn(entity)?;
                    for query in self.queries.values_mut() {
                        query.entity_deleted(entity);
                    }
                    self.entity_allocator.free(entity);
                    debug!("despawned {entity:?}");
                }
                // Spawned and despawned within one tick, it never reached storage.
                (None, true) => self.entity_allocator.free(entity),
                (None, false) => warn!("ignoring despawn of {entity:?}, it is not alive"),
            }
            return Ok(());
        }

        let EntityEdit {
            baseline,
            signature,
            pending,
            just_spawned,
            ..
        } = edit;

        let (target, row) = match (location, just_spawned) {
            (None, true) => {
                let target = self.storage.get_or_create(&signature, &self.registry)?;
                (target, self.storage.spawn_at(entity, target)?)
            }
            (Some(location), false) => {
                let target = self.storage.get_or_create(&signature, &self.registry)?;
                if location.archetype_id() == target {
                    (target, location.row())
                } else {
                    (target, self.storage.migrate(entity, location, target)?)
                }
            }
            (Some(_), true) => {
                warn!("ignoring spawn of {entity:?}, it is already alive");
                return Ok(());
            }
            (None, false) => {
                warn!("ignoring edits to {entity:?}, it is not alive");
                return Ok(());
            }
        };

        trace!(
            "{entity:?}: {} -> {} components, {} written",
            baseline.len(),
            signature.len(),
            pending.len()
        );
        for (component, value) in pending {
            self.storage.write(target, row, component, value)?;
        }

        for query in self.queries.values_mut() {
            query.entity_updated(entity, &baseline, &signature, &self.storage);
        }
        Ok(())
    }
}

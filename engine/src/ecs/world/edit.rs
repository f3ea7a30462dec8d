use std::{any::Any, collections::HashMap};

use crate::ecs::{
    component::{self, Signature},
    entity::Entity,
    storage::Storage,
    system::Command,
};

/// The net effect of one tick's commands on one entity.
pub(crate) struct EntityEdit {
    /// Signature before the tick. Empty if the entity was not live.
    pub baseline: Signature,

    /// Signature once every command so far is applied.
    pub signature: Signature,

    /// Component values to write, by component.
    pub pending: HashMap<component::Id, Box<dyn Any>>,

    pub just_spawned: bool,
    pub despawning: bool,
}

impl EntityEdit {
    fn new(baseline: Signature) -> Self {
        Self {
            signature: baseline.clone(),
            baseline,
            pending: HashMap::new(),
            just_spawned: false,
            despawning: false,
        }
    }

    /// Fold one command into the edit. Once despawning, later commands are discarded.
    fn record(&mut self, command: Command) {
        if self.despawning {
            return;
        }

        match command {
            Command::Spawn { .. } => {
                self.signature.clear();
                self.pending.clear();
                self.just_spawned = true;
            }
            Command::Despawn { .. } => {
                self.despawning = true;
                self.pending.clear();
            }
            Command::AddComponent {
                component, value, ..
            } => {
                self.signature.insert(component);
                self.pending.insert(component, value);
            }
            Command::RemoveComponent { component, .. } => {
                self.signature.remove(component);
                self.pending.remove(&component);
            }
        }
    }
}

/// Fold a drained command queue into one edit per entity. Edits are returned in the order each
/// entity first appears in the queue.
pub(crate) fn collect(
    commands: Vec<Command>,
    storage: &Storage,
    registry: &component::Registry,
) -> Vec<(Entity, EntityEdit)> {
    let mut edits: Vec<(Entity, EntityEdit)> = Vec::new();
    let mut index: HashMap<Entity, usize> = HashMap::new();

    for command in commands {
        let entity = command.entity();
        let slot = *index.entry(entity).or_insert_with(|| {
            let baseline = storage
                .signature_of(entity)
                .cloned()
                .unwrap_or_else(|| registry.empty_signature());
            edits.push((entity, EntityEdit::new(baseline)));
            edits.len() - 1
        });
        edits[slot].1.record(command);
    }

    edits
}

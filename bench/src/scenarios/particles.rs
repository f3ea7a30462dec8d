//! Particle system benchmark scenario.
//!
//! Simulates a particle system with:
//! - Components: Particle, Position, Velocity, Lifetime, Color
//! - Systems: movement, lifetime decay with respawn, fade
//!
//! This scenario tests:
//! - Query refresh cost when most entities are rewritten every tick
//! - Entity spawn/despawn throughput (particles dying and respawning)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_ecs::ecs::{Commands, EcsError, Entity, Query, Res, With, World, WorldConfig};
use rusty_ecs_macros::Resource;

use crate::{
    components::{Color, DeltaTime, Lifetime, Particle, Position, Velocity},
    scenarios::Scenario,
};

/// Configuration for the particle benchmark.
pub struct ParticleConfig {
    /// Total number of particles to maintain.
    pub particle_count: usize,
    /// Simulated delta time per frame.
    pub delta_time: f32,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            delta_time: 1.0 / 60.0,
            seed: 12345,
        }
    }
}

#[derive(Resource)]
struct ParticleFactory(ChaCha8Rng);

impl ParticleFactory {
    fn create_particle(&mut self) -> (Particle, Position, Velocity, Lifetime, Color) {
        let rng = &mut self.0;
        let position = Position {
            x: rng.gen_range(-100.0..100.0),
            y: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
        };
        let velocity = Velocity {
            x: rng.gen_range(-10.0..10.0),
            y: rng.gen_range(-10.0..10.0),
            z: rng.gen_range(-10.0..10.0),
        };
        let lifetime = Lifetime {
            remaining: rng.gen_range(0.5..2.0),
            total: 2.0,
        };
        let color = Color {
            r: rng.gen_range(0.0..1.0),
            g: rng.gen_range(0.0..1.0),
            b: rng.gen_range(0.0..1.0),
            a: 1.0,
        };

        (Particle, position, velocity, lifetime, color)
    }
}

/// System: Move particles along their velocity.
fn system_movement(
    query: &Query<With<Particle>, (Entity, Position, Velocity)>,
    dt: Res<DeltaTime>,
    commands: Commands,
) {
    let dt = dt.borrow().0;
    for (entity, position, velocity) in query {
        commands
            .entity(*entity)
            .insert(position.advanced(velocity, dt))
            .ok();
    }
}

/// System: Decay lifetimes, replacing every expired particle with a fresh one.
fn system_lifetime(
    query: &Query<With<Particle>, (Entity, Lifetime)>,
    dt: Res<DeltaTime>,
    factory: Res<ParticleFactory>,
    commands: Commands,
) {
    let dt = dt.borrow().0;
    let mut factory = factory.borrow_mut();
    for (entity, lifetime) in query {
        let remaining = lifetime.remaining - dt;
        if remaining > 0.0 {
            commands
                .entity(*entity)
                .insert(Lifetime {
                    remaining,
                    ..*lifetime
                })
                .ok();
            continue;
        }

        commands.despawn(*entity);
        if let Ok(particle) = commands.try_spawn() {
            particle.insert(factory.create_particle()).ok();
        }
    }
}

/// System: Fade particles based on remaining lifetime.
fn system_fade(query: &Query<(), (Entity, Lifetime, Color)>, commands: Commands) {
    for (entity, lifetime, color) in query {
        let a = (lifetime.remaining / lifetime.total).max(0.0);
        commands.entity(*entity).insert(Color { a, ..*color }).ok();
    }
}

pub struct ParticleScenario {
    config: ParticleConfig,
    world: World,
}

impl ParticleScenario {
    pub fn with_config(config: ParticleConfig) -> Self {
        // Dead particles keep their ids until the tick applies, so replacements need headroom.
        let capacity = (config.particle_count * 2).max(1) as u32;
        Self {
            world: World::with_config(WorldConfig::default().with_max_entities(capacity)),
            config,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Default for ParticleScenario {
    fn default() -> Self {
        Self::with_config(ParticleConfig::default())
    }
}

impl Scenario for ParticleScenario {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    fn setup(&mut self) -> Result<(), EcsError> {
        let world = &mut self.world;
        world.register_components::<(Particle, Position, Velocity, Lifetime, Color)>()?;
        world.insert_resource(DeltaTime(self.config.delta_time));
        let factory = world.insert_resource(ParticleFactory(ChaCha8Rng::seed_from_u64(
            self.config.seed,
        )));

        {
            let mut factory = factory.borrow_mut();
            let commands = world.commands();
            for _ in 0..self.config.particle_count {
                commands.try_spawn()?.insert(factory.create_particle())?;
            }
        }

        world.add_systems((system_movement, system_lifetime, system_fade))?;
        world.tick()?;
        Ok(())
    }

    fn update(&mut self) -> Result<(), EcsError> {
        self.world.tick().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(particle_count: usize) -> ParticleScenario {
        let mut scenario = ParticleScenario::with_config(ParticleConfig {
            particle_count,
            ..Default::default()
        });
        scenario.setup().unwrap();
        scenario
    }

    #[test]
    fn setup_spawns_every_particle() {
        // Given
        let scenario = scenario(100);

        // Then
        assert_eq!(scenario.entity_count(), 100);
        assert_eq!(scenario.world().archetype_count(), 1);
    }

    #[test]
    fn particle_count_is_stable_across_respawns() {
        // Given
        let mut scenario = scenario(100);

        // When - Long enough for every initial particle to expire
        for _ in 0..150 {
            scenario.update().unwrap();
        }

        // Then
        assert_eq!(scenario.entity_count(), 100);
        assert_eq!(scenario.world().tick_count(), 151);
    }

    #[test]
    fn movement_advances_positions() {
        // Given
        let mut scenario = scenario(10);
        let before: Vec<(Entity, Position)> = scenario
            .world
            .query::<(), (Entity, Position)>()
            .unwrap()
            .iter()
            .copied()
            .collect();

        // When
        scenario.update().unwrap();

        // Then
        let world = scenario.world();
        let moved = before
            .iter()
            .filter(|(entity, position)| {
                world
                    .get::<Position>(*entity)
                    .unwrap()
                    .is_some_and(|current| current != position)
            })
            .count();
        assert!(moved > 0);
    }
}

//! Realistic workload benchmarks.
//!
//! Each scenario owns a [`World`](rusty_ecs::ecs::World), populates it in
//! [`Scenario::setup`] and advances it one tick per [`Scenario::update`].
//!
//! # Scenarios
//!
//! - **Particles**: High entity count, simple components, constant spawn/despawn churn

pub mod particles;

pub use particles::{ParticleConfig, ParticleScenario};

use rusty_ecs::ecs::EcsError;

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Number of live entities.
    fn entity_count(&self) -> usize;

    /// Register components, resources and systems, then spawn the initial entities.
    fn setup(&mut self) -> Result<(), EcsError>;

    /// Run one tick.
    fn update(&mut self) -> Result<(), EcsError>;
}

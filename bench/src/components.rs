//! Common component types used across benchmarks.
//!
//! Sizes are representative of typical simulation components. Every type here fits within a
//! default world's component capacity.

use rusty_ecs_macros::{Component, Resource};

// =============================================================================
// Motion Components
// =============================================================================

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    /// The position after moving at `velocity` for `dt` seconds.
    pub fn advanced(&self, velocity: &Velocity, dt: f32) -> Self {
        Self {
            x: self.x + velocity.x * dt,
            y: self.y + velocity.y * dt,
            z: self.z + velocity.z * dt,
        }
    }
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Simulated frame time.
#[derive(Resource, Clone, Copy, Debug)]
pub struct DeltaTime(pub f32);

// =============================================================================
// Particle Components
// =============================================================================

/// A Particle marker
#[derive(Component, Clone, Copy, Debug)]
pub struct Particle;

/// Particle lifetime tracking.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

/// RGBA color (16 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

// =============================================================================
// Fragmentation Components
// =============================================================================

/// Shared data component for fragmentation tests.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Data {
    pub value: f64,
}

// Marker components for creating many archetypes
macro_rules! define_marker_components {
    ($($name:ident),*) => {
        $(
            #[derive(Component, Clone, Copy, Debug, Default)]
            pub struct $name;
        )*
    };
}

define_marker_components!(
    MarkerA, MarkerB, MarkerC, MarkerD, MarkerE, MarkerF, MarkerG, MarkerH
);

/// Number of marker types, and so of archetypes a fragmented world spreads over.
pub const MARKER_COUNT: usize = 8;

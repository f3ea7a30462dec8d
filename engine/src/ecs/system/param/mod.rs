//! System parameters.
//!
//! A system is any function whose arguments all implement [`Parameter`]:
//!
//! | Parameter | Grants |
//! |-----------|--------|
//! | `&Query<F, D>` | the cached rows of one query |
//! | [`Commands`] | the deferred command queue |
//! | `&World` | read-only world access |
//! | [`Res<T>`](crate::ecs::Res) | a handle to resource `T` |
//!
//! Parameters are prepared once when the system is added to the world, which creates query caches
//! and checks that resources exist, and fetched again before every run.

mod commands;
mod query;
mod resource;
mod world;

pub use commands::{Commands, EntityCommands};

use crate::ecs::{error::EcsError, world::World};

pub trait Parameter: Sized {
    /// The value handed to the system, borrowing the world for `'w`.
    type Value<'w>;

    /// Set up whatever the parameter needs in the world. Called once, when the system is added.
    fn prepare(world: &mut World) -> Result<(), EcsError>;

    /// Produce the parameter value for one run.
    fn fetch<'w>(world: &'w World) -> Result<Self::Value<'w>, EcsError>;
}

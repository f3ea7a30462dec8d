pub mod component;
pub mod config;
pub mod entity;
pub mod error;
pub mod query;
pub mod resource;
pub(crate) mod storage;
pub mod system;
pub(crate) mod util;
pub mod world;

pub use component::Component;
pub use config::WorldConfig;
pub use entity::Entity;
pub use error::{EcsError, StorageError};
pub use query::{All, Any, Has, Maybe, One, Query, With, Without};
pub use resource::{Res, Resource};
pub use storage::{Archetype, Row, archetype::Id as ArchetypeId};
pub use system::{Commands, EntityCommands, IntoSystem, IntoSystems, Parameter, System};
pub use world::{TickPhase, TickStatus, World};

pub use rusty_ecs_macros::{Component, Resource};

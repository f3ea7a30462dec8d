//! Systems: per-tick logic run against a world.
//!
//! Any function whose arguments all implement [`Parameter`] converts into a [`System`] through
//! [`IntoSystem`]:
//!
//! ```rust,ignore
//! fn gravity(bodies: &Query<With<Body>, (Entity, Velocity)>, commands: Commands) {
//!     for (entity, velocity) in bodies {
//!         commands.entity(*entity).insert(velocity.accelerated(-9.8)).ok();
//!     }
//! }
//!
//! world.add_system(gravity)?;
//! world.add_systems((spawn_waves, despawn_dead))?;
//! ```
//!
//! Systems run one after another, in the order they were added, once per tick. They see the world
//! as it was when the tick started: queries and component reads do not reflect commands queued
//! earlier in the same tick.

mod command;
mod function;
pub mod param;

pub use command::{Command, CommandQueue};
pub use function::WithSystemParams;
pub use param::{Commands, EntityCommands, Parameter};

use crate::ecs::{error::EcsError, world::World};

/// A type erased, runnable system.
pub struct System {
    name: &'static str,
    run: Box<dyn FnMut(&World) -> Result<(), EcsError>>,
}

impl System {
    /// Wrap a closure as a system.
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: FnMut(&World) -> Result<(), EcsError> + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }

    /// The name of the function the system was built from.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the system once. Fails, without running, if a parameter cannot be fetched.
    #[inline]
    pub fn run(&mut self, world: &World) -> Result<(), EcsError> {
        (self.run)(world)
    }
}

impl std::fmt::Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System").field("name", &self.name).finish()
    }
}

/// Conversion into a [`System`], preparing its parameters against `world`.
///
/// `Marker` only disambiguates the blanket implementations and is inferred.
pub trait IntoSystem<Marker>: Sized {
    fn into_system(self, world: &mut World) -> Result<System, EcsError>;
}

/// A tuple of systems, added in tuple order.
pub trait IntoSystems<Marker>: Sized {
    fn into_systems(self, world: &mut World) -> Result<Vec<System>, EcsError>;
}

macro_rules! tuple_into_systems {
    ($(($name:ident, $marker:ident)),*) => {
        impl<$($name: IntoSystem<$marker>, $marker),*> IntoSystems<($($marker,)*)> for ($($name,)*) {
            fn into_systems(self, world: &mut World) -> Result<Vec<System>, EcsError> {
                #[allow(non_snake_case)]
                let ($($name,)*) = self;
                Ok(vec![$($name.into_system(world)?),*])
            }
        }
    };
}

tuple_into_systems!((A, MA));
tuple_into_systems!((A, MA), (B, MB));
tuple_into_systems!((A, MA), (B, MB), (C, MC));
tuple_into_systems!((A, MA), (B, MB), (C, MC), (D, MD));
tuple_into_systems!((A, MA), (B, MB), (C, MC), (D, MD), (E, ME));
tuple_into_systems!((A, MA), (B, MB), (C, MC), (D, MD), (E, ME), (F, MF));
tuple_into_systems!((A, MA), (B, MB), (C, MC), (D, MD), (E, ME), (F, MF), (G, MG));
tuple_into_systems!((A, MA), (B, MB), (C, MC), (D, MD), (E, ME), (F, MF), (G, MG), (H, MH));

//! Component types and their registration.
//!
//! Components are plain data attached to entities. Each component type must be registered with
//! the world before it is used. Registration assigns a stable [`Id`], in first registration order,
//! which doubles as the component's bit in a [`Signature`] and the key of its column in every
//! archetype.
//!
//! ```rust,ignore
//! #[derive(Component, Clone)]
//! struct Position { x: f32, y: f32 }
//!
//! world.register_components::<(Position, Velocity)>()?;
//! ```

mod registry;
mod set;
mod signature;

pub use registry::{Info, Registry};
pub use set::{Set, Target};
pub use signature::Signature;

/// A component identifier, unique within one world.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position of this component in id indexed storage, and its bit in a signature.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// Marker trait for data that can be attached to an entity.
///
/// Query rows are value snapshots, so components must be `Clone`. Use `#[derive(Component)]`.
pub trait Component: 'static + Clone {}

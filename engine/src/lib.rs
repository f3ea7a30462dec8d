//! An archetype based entity component system with deferred, end of tick mutation.
//!
//! Systems observe a frozen view of the [`ecs::World`] while they run. Structural changes
//! (spawning, despawning, adding or removing components) are queued as commands and applied in
//! one batch when the tick ends, after which every cached [`ecs::Query`] is refreshed.

// Allow the derive macros to refer to `::rusty_ecs` from inside this crate.
extern crate self as rusty_ecs;

pub mod ecs;

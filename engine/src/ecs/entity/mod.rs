//! Entity identifiers and the fixed size pool they are drawn from.
//!
//! An [`Entity`] is an opaque handle made of an [`Id`] (the slot in the pool) and a
//! [`Generation`] (how many times that slot has been recycled). Ids are handed out by the
//! [`Allocator`] and only return to it once a despawn has been applied at the end of a tick, so an
//! id is never shared by two live entities. Bumping the generation on every recycle lets the world
//! reject commands that still target a previous occupant of the slot:
//!
//! ```rust,ignore
//! let entity = allocator.alloc()?;  // Entity { id: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc()?;  // Entity { id: 0, generation: 1 }
//! assert_ne!(entity, reused);
//! ```
//!
//! Recycled ids are reused in the order they were freed.

use std::sync::atomic::{AtomicU32, Ordering};

use crossbeam::queue::SegQueue;

/// How many times an entity id has been recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The generation of an id that has never been recycled.
    const FIRST: Self = Self(0);

    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// The pool slot of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A handle to an entity in a [`World`](crate::ecs::World).
///
/// A world holds at most one live entity per `id`; the `generation` tells a live entity apart from
/// stale handles to earlier occupants of the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    id: Id,
    generation: Generation,
}

impl Entity {
    /// Construct an entity in its first generation. Mostly useful in tests.
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Position of this entity in id indexed storage.
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Entities order by id first, then generation.
impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

/// Fixed capacity entity id pool.
///
/// Allocation goes through `&self` so that [`Commands`](crate::ecs::Commands) can reserve ids while
/// systems only hold a shared borrow of the world. Freed ids go to a FIFO dead pool and are
/// handed out again, with their generation bumped, before any fresh id is used.
#[derive(Debug)]
pub struct Allocator {
    /// Current generation of every id slot.
    generations: Box<[AtomicU32]>,

    /// Ids available for reuse, oldest first.
    dead_pool: SegQueue<Id>,

    /// Next never-used id.
    next_id: AtomicU32,
}

impl Allocator {
    /// Construct an allocator able to hand out `capacity` distinct ids.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            generations: (0..capacity).map(|_| AtomicU32::new(0)).collect(),
            dead_pool: SegQueue::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Number of ids this allocator manages.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.generations.len() as u32
    }

    /// Number of ids currently handed out and not yet freed.
    #[inline]
    pub fn reserved(&self) -> u32 {
        self.next_id.load(Ordering::Acquire) - self.dead_pool.len() as u32
    }

    /// Reserve an entity id, preferring recycled ids. Returns `None` once every id in the pool is
    /// reserved.
    pub fn alloc(&self) -> Option<Entity> {
        if let Some(id) = self.dead_pool.pop() {
            return Some(Entity::new_with_generation(id, self.generation(id)));
        }

        let capacity = self.capacity();
        self.next_id
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |next| {
                (next < capacity).then_some(next + 1)
            })
            .ok()
            .map(|id| Entity::new(Id(id)))
    }

    /// Return an entity's id to the pool. The next entity to use the id gets the next generation.
    pub fn free(&self, entity: Entity) {
        let id = entity.id();
        if let Some(generation) = self.generations.get(id.0 as usize) {
            generation.fetch_add(1, Ordering::Release);
            self.dead_pool.push(id);
        }
    }

    #[inline]
    fn generation(&self, id: Id) -> Generation {
        Generation(
            self.generations
                .get(id.0 as usize)
                .map_or(0, |generation| generation.load(Ordering::Acquire)),
        )
    }
}

//! Resources: per-world singletons.
//!
//! A resource is a value stored once per type in a world, such as a window handle, a frame clock
//! or a score. Resources are shared through [`Res`] handles, which are cheap to clone and hand out
//! checked borrows of the value.
//!
//! | Aspect | Resource | Component |
//! |--------|----------|-----------|
//! | Cardinality | One per type per world | One per entity |
//! | Access | Direct by type | Query over matching entities |
//! | Mutation | Immediate, through the handle | Deferred to the end of the tick |
//!
//! ```rust,ignore
//! #[derive(Resource)]
//! struct Score(u32);
//!
//! world.insert_resource(Score(0));
//!
//! fn award(score: Res<Score>) {
//!     score.borrow_mut().0 += 10;
//! }
//! ```

use std::{
    any::{Any, TypeId, type_name},
    cell::{Ref, RefCell, RefMut},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use log::debug;

/// Marker trait for values stored as world singletons. Use `#[derive(Resource)]`.
pub trait Resource: 'static {}

/// A shared handle to a resource. Handles are reference counted and not synchronized, so they
/// stay on the world's thread.
pub struct Res<T: Resource> {
    value: Rc<RefCell<T>>,
}

impl<T: Resource> Res<T> {
    fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Immutably borrow the resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource is currently mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    /// Mutably borrow the resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource is currently borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.value.borrow_mut()
    }

    /// True if both handles point at the same stored value.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl<T: Resource> Clone for Res<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

impl<T: Resource + fmt::Debug> fmt::Debug for Res<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Res").field(&self.value.borrow()).finish()
    }
}

/// Type keyed resource map. Each entry is a boxed `Res<T>`.
#[derive(Default)]
pub(crate) struct Resources {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl Resources {
    /// Store `value`, replacing any previous resource of the same type. Handles to the replaced
    /// value keep it alive but no longer reach the world.
    pub fn insert<T: Resource>(&mut self, value: T) -> Res<T> {
        let handle = Res::new(value);
        if self
            .values
            .insert(TypeId::of::<T>(), Box::new(handle.clone()))
            .is_some()
        {
            debug!("replaced resource `{}`", type_name::<T>());
        }
        handle
    }

    pub fn get<T: Resource>(&self) -> Option<Res<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<Res<T>>())
            .cloned()
    }

    pub fn remove<T: Resource>(&mut self) -> Option<Res<T>> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<Res<T>>().ok())
            .map(|handle| *handle)
    }

    #[inline]
    pub fn contains<T: Resource>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::Resource;

    use super::*;

    #[derive(Resource, Debug, PartialEq)]
    struct Score(u32);

    #[derive(Resource)]
    struct WindowHandle(usize);

    #[test]
    fn insert_and_get() {
        // Given
        let mut resources = Resources::default();

        // When
        let inserted = resources.insert(Score(3));
        let fetched = resources.get::<Score>().unwrap();

        // Then
        assert!(inserted.ptr_eq(&fetched));
        assert_eq!(*fetched.borrow(), Score(3));
        assert!(resources.get::<WindowHandle>().is_none());
    }

    #[test]
    fn handles_share_the_value() {
        // Given
        let mut resources = Resources::default();
        let handle = resources.insert(Score(0));

        // When
        resources.get::<Score>().unwrap().borrow_mut().0 += 5;

        // Then
        assert_eq!(handle.borrow().0, 5);
    }

    #[test]
    fn insert_replaces_previous_value() {
        // Given
        let mut resources = Resources::default();
        let old = resources.insert(WindowHandle(1));

        // When
        let new = resources.insert(WindowHandle(2));

        // Then - One instance per type
        assert!(resources.contains::<WindowHandle>());
        assert!(!old.ptr_eq(&new));
        assert_eq!(resources.get::<WindowHandle>().unwrap().borrow().0, 2);
    }

    #[test]
    fn remove_returns_the_handle() {
        // Given
        let mut resources = Resources::default();
        resources.insert(Score(9));

        // When
        let removed = resources.remove::<Score>().unwrap();

        // Then
        assert_eq!(removed.borrow().0, 9);
        assert!(!resources.contains::<Score>());
    }
}

//! Query filters: pure predicates over an entity's signature.
//!
//! | Filter | Matches when |
//! |--------|--------------|
//! | `()` | always |
//! | `With<S>` | every component of `S` is present |
//! | `Without<S>` | no component of `S` is present |
//! | `All<(F..)>` | every inner filter matches |
//! | `Any<(F..)>` | at least one inner filter matches |
//! | `One<(F..)>` | exactly one inner filter matches |

use std::marker::PhantomData;

use crate::{
    all_tuples,
    ecs::{
        component::{self, Set, Signature},
        error::EcsError,
    },
};

pub trait Filter: Sized + 'static {
    /// Resolve the component ids the filter inspects.
    fn build(registry: &component::Registry) -> Result<Self, EcsError>;

    /// Evaluate the filter against an entity's signature.
    fn fetch(&self, signature: &Signature) -> bool;
}

/// A tuple of filters, combined by [`All`], [`Any`] or [`One`].
pub trait FilterSet: Sized + 'static {
    fn build(registry: &component::Registry) -> Result<Self, EcsError>;

    /// Number of member filters matching `signature`.
    fn count_matches(&self, signature: &Signature) -> usize;

    /// Number of member filters.
    fn len(&self) -> usize;
}

impl Filter for () {
    fn build(_registry: &component::Registry) -> Result<Self, EcsError> {
        Ok(())
    }

    #[inline]
    fn fetch(&self, _signature: &Signature) -> bool {
        true
    }
}

/// Matches entities holding every component of `S`.
pub struct With<S: Set> {
    mask: Signature,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Set> Filter for With<S> {
    fn build(registry: &component::Registry) -> Result<Self, EcsError> {
        Ok(Self {
            mask: registry.signature::<S>()?,
            _marker: PhantomData,
        })
    }

    #[inline]
    fn fetch(&self, signature: &Signature) -> bool {
        signature.contains_all(&self.mask)
    }
}

/// Matches entities holding none of the components of `S`.
pub struct Without<S: Set> {
    mask: Signature,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Set> Filter for Without<S> {
    fn build(registry: &component::Registry) -> Result<Self, EcsError> {
        Ok(Self {
            mask: registry.signature::<S>()?,
            _marker: PhantomData,
        })
    }

    #[inline]
    fn fetch(&self, signature: &Signature) -> bool {
        !signature.contains_any(&self.mask)
    }
}

/// Matches when every member filter matches.
pub struct All<F: FilterSet>(F);

/// Matches when at least one member filter matches.
pub struct Any<F: FilterSet>(F);

/// Matches when exactly one member filter matches.
pub struct One<F: FilterSet>(F);

impl<F: FilterSet> Filter for All<F> {
    fn build(registry: &component::Registry) -> Result<Self, EcsError> {
        F::build(registry).map(Self)
    }

    #[inline]
    fn fetch(&self, signature: &Signature) -> bool {
        self.0.count_matches(signature) == self.0.len()
    }
}

impl<F: FilterSet> Filter for Any<F> {
    fn build(registry: &component::Registry) -> Result<Self, EcsError> {
        F::build(registry).map(Self)
    }

    #[inline]
    fn fetch(&self, signature: &Signature) -> bool {
        self.0.count_matches(signature) > 0
    }
}

impl<F: FilterSet> Filter for One<F> {
    fn build(registry: &component::Registry) -> Result<Self, EcsError> {
        F::build(registry).map(Self)
    }

    #[inline]
    fn fetch(&self, signature: &Signature) -> bool {
        self.0.count_matches(signature) == 1
    }
}

macro_rules! tuple_filter_set {
    ($($name: ident),*) => {
        impl<$($name: Filter),*> FilterSet for ($($name,)*) {
            fn build(registry: &component::Registry) -> Result<Self, EcsError> {
                Ok(($(<$name as Filter>::build(registry)?,)*))
            }

            fn count_matches(&self, signature: &Signature) -> usize {
                #[allow(non_snake_case)]
                let ($($name,)*) = self;
                0 $(+ usize::from($name.fetch(signature)))*
            }

            fn len(&self) -> usize {
                [$(stringify!($name)),*].len()
            }
        }
    }
}

all_tuples!(tuple_filter_set);

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::Component;

    use super::*;

    #[derive(Component, Clone)]
    struct A;

    #[derive(Component, Clone)]
    struct B;

    #[derive(Component, Clone)]
    struct C;

    fn setup() -> component::Registry {
        let mut registry = component::Registry::with_capacity(8);
        registry.register_set::<(A, B, C)>().unwrap();
        registry
    }

    fn signature<S: Set>(registry: &component::Registry) -> Signature {
        registry.signature::<S>().unwrap()
    }

    fn matches<F: Filter>(registry: &component::Registry, signature: &Signature) -> bool {
        F::build(registry).unwrap().fetch(signature)
    }

    #[test]
    fn unit_matches_everything() {
        let registry = setup();
        assert!(matches::<()>(&registry, &registry.empty_signature()));
    }

    #[test]
    fn with_and_without() {
        // Given
        let registry = setup();
        let ab = signature::<(A, B)>(&registry);

        // Then
        assert!(matches::<With<A>>(&registry, &ab));
        assert!(matches::<With<(A, B)>>(&registry, &ab));
        assert!(!matches::<With<(A, C)>>(&registry, &ab));
        assert!(matches::<Without<C>>(&registry, &ab));
        assert!(!matches::<Without<(B, C)>>(&registry, &ab));
    }

    #[test]
    fn all_any_one() {
        // Given
        let registry = setup();
        let ab = signature::<(A, B)>(&registry);
        let c = signature::<C>(&registry);

        // Then
        assert!(matches::<All<(With<A>, Without<C>)>>(&registry, &ab));
        assert!(!matches::<All<(With<A>, With<C>)>>(&registry, &ab));
        assert!(matches::<Any<(With<A>, With<C>)>>(&registry, &ab));
        assert!(!matches::<Any<(With<A>, With<B>)>>(&registry, &c));
        assert!(matches::<One<(With<A>, With<C>)>>(&registry, &ab));
        assert!(!matches::<One<(With<A>, With<B>)>>(&registry, &ab));
        assert!(!matches::<One<(With<A>, With<B>)>>(&registry, &c));
    }

    #[test]
    fn nested_filters() {
        // Given
        let registry = setup();
        let a = signature::<A>(&registry);
        let abc = signature::<(A, B, C)>(&registry);

        // Then
        type Nested = Any<(All<(With<A>, Without<B>)>, With<C>)>;
        assert!(matches::<Nested>(&registry, &a));
        assert!(matches::<Nested>(&registry, &abc));
        assert!(!matches::<Nested>(&registry, &signature::<B>(&registry)));
    }

    #[test]
    fn unregistered_filter_component_is_an_error() {
        // Given
        #[derive(Component, Clone)]
        struct Unknown;
        let registry = setup();

        // When
        let result = With::<Unknown>::build(&registry);

        // Then
        assert!(matches!(result, Err(EcsError::UnregisteredComponent { .. })));
    }
}

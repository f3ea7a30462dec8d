use std::any::Any;

use crate::{
    all_tuples,
    ecs::{
        component::{Component, Id, Registry},
        error::EcsError,
    },
};

/// Receives the values of a [`Set`] one component at a time.
pub trait Target {
    fn apply<C: Component>(&mut self, id: Id, value: C);
}

/// Collects values type erased, in set order.
impl Target for Vec<(Id, Box<dyn Any>)> {
    fn apply<C: Component>(&mut self, id: Id, value: C) {
        self.push((id, Box::new(value)));
    }
}

/// A component type or a tuple of component types.
///
/// Sets name groups of components for registration (`register_components::<(A, B)>()`), for
/// filters (`With<(A, B)>`) and for removal. Set values carry the component data for inserts.
pub trait Set: Sized + 'static {
    /// Register every component of the set.
    fn register(registry: &mut Registry) -> Result<(), EcsError>;

    /// Append the ids of the set's components to `ids`.
    fn ids(registry: &Registry, ids: &mut Vec<Id>) -> Result<(), EcsError>;

    /// Hand every value of the set to `target`. Nothing is applied unless every component of the
    /// set is registered.
    fn apply<T: Target>(self, registry: &Registry, target: &mut T) -> Result<(), EcsError> {
        let mut ids = Vec::new();
        Self::ids(registry, &mut ids)?;
        self.apply_unchecked(&mut ids.into_iter(), target);
        Ok(())
    }

    /// Hand every value to `target`, taking ids from `ids` in set order.
    #[doc(hidden)]
    fn apply_unchecked<T: Target>(self, ids: &mut std::vec::IntoIter<Id>, target: &mut T);
}

impl<C: Component> Set for C {
    fn register(registry: &mut Registry) -> Result<(), EcsError> {
        registry.register::<C>().map(|_| ())
    }

    fn ids(registry: &Registry, ids: &mut Vec<Id>) -> Result<(), EcsError> {
        ids.push(registry.id::<C>()?);
        Ok(())
    }

    fn apply_unchecked<T: Target>(self, ids: &mut std::vec::IntoIter<Id>, target: &mut T) {
        if let Some(id) = ids.next() {
            target.apply::<C>(id, self);
        }
    }
}

impl Set for () {
    fn register(_registry: &mut Registry) -> Result<(), EcsError> {
        Ok(())
    }

    fn ids(_registry: &Registry, _ids: &mut Vec<Id>) -> Result<(), EcsError> {
        Ok(())
    }

    fn apply_unchecked<T: Target>(self, _ids: &mut std::vec::IntoIter<Id>, _target: &mut T) {}
}

macro_rules! tuple_set {
    ($($name: ident),*) => {
        impl<$($name: Set),*> Set for ($($name,)*) {
            fn register(registry: &mut Registry) -> Result<(), EcsError> {
                $(<$name as Set>::register(registry)?;)*
                Ok(())
            }

            fn ids(registry: &Registry, ids: &mut Vec<Id>) -> Result<(), EcsError> {
                $(<$name as Set>::ids(registry, ids)?;)*
                Ok(())
            }

            fn apply_unchecked<CT: Target>(self, ids: &mut std::vec::IntoIter<Id>, target: &mut CT) {
                #[allow(non_snake_case)]
                let ( $($name,)* ) = self;
                $(<$name as Set>::apply_unchecked($name, ids, target);)*
            }
        }
    }
}

all_tuples!(tuple_set);

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::Component;

    use super::*;

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Comp1 {
        value: u32,
    }

    #[derive(Component, Clone, Debug, PartialEq)]
    struct Comp2 {
        value: f32,
    }

    fn registry() -> Registry {
        let mut registry = Registry::with_capacity(32);
        registry.register_set::<(Comp1, Comp2)>().unwrap();
        registry
    }

    #[test]
    fn single_component_set() {
        // Given
        let registry = registry();
        let mut values: Vec<(Id, Box<dyn Any>)> = Vec::new();

        // When
        Comp2 { value: 1.5 }.apply(&registry, &mut values).unwrap();

        // Then
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0, Id::new(1));
        assert_eq!(
            values[0].1.downcast_ref::<Comp2>(),
            Some(&Comp2 { value: 1.5 })
        );
    }

    #[test]
    fn tuple_component_set_keeps_order() {
        // Given
        let registry = registry();
        let mut values: Vec<(Id, Box<dyn Any>)> = Vec::new();

        // When
        (Comp2 { value: 2.0 }, Comp1 { value: 7 })
            .apply(&registry, &mut values)
            .unwrap();

        // Then
        let ids: Vec<_> = values.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![Id::new(1), Id::new(0)]);
        assert_eq!(
            values[1].1.downcast_ref::<Comp1>(),
            Some(&Comp1 { value: 7 })
        );
    }

    #[test]
    fn unregistered_member_applies_nothing() {
        // Given
        #[derive(Component, Clone, Debug)]
        struct Unknown;

        let registry = registry();
        let mut values: Vec<(Id, Box<dyn Any>)> = Vec::new();

        // When
        let result = (Comp1 { value: 1 }, Unknown).apply(&registry, &mut values);

        // Then
        assert!(matches!(result, Err(EcsError::UnregisteredComponent { .. })));
        assert!(values.is_empty());
    }
}

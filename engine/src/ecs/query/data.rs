use std::marker::PhantomData;

use crate::{
    all_tuples,
    ecs::{
        component::{self, Component, Signature},
        entity::Entity,
        error::EcsError,
        storage::{Archetype, Row},
    },
};

/// What a query row holds for each matched entity.
///
/// A component type `C` requires the component and yields a clone of it. [`Entity`] yields the
/// entity handle. [`Has<C>`] and [`Maybe<C>`] do not require the component. Tuples combine data.
pub trait Data: 'static {
    /// Resolved component ids, computed once when the query is built.
    type State: 'static;

    /// The row value produced for one entity.
    type Output: 'static;

    /// Resolve component ids and set the bit of every required component in `required`.
    fn init(registry: &component::Registry, required: &mut Signature)
    -> Result<Self::State, EcsError>;

    /// Read the row of `entity`. `None` if a required component holds no value.
    fn fetch(
        state: &Self::State,
        entity: Entity,
        archetype: &Archetype,
        row: Row,
    ) -> Option<Self::Output>;
}

/// Yields whether the entity has component `C`, without requiring it.
pub struct Has<C: Component>(PhantomData<fn() -> C>);

/// Yields a clone of component `C` if the entity has it, without requiring it.
pub struct Maybe<C: Component>(PhantomData<fn() -> C>);

impl Data for Entity {
    type State = ();
    type Output = Entity;

    fn init(
        _registry: &component::Registry,
        _required: &mut Signature,
    ) -> Result<Self::State, EcsError> {
        Ok(())
    }

    #[inline]
    fn fetch(_state: &(), entity: Entity, _archetype: &Archetype, _row: Row) -> Option<Entity> {
        Some(entity)
    }
}

impl<C: Component> Data for C {
    type State = component::Id;
    type Output = C;

    fn init(
        registry: &component::Registry,
        required: &mut Signature,
    ) -> Result<Self::State, EcsError> {
        let id = registry.id::<C>()?;
        required.insert(id);
        Ok(id)
    }

    #[inline]
    fn fetch(state: &component::Id, _entity: Entity, archetype: &Archetype, row: Row) -> Option<C> {
        archetype.get::<C>(*state, row).cloned()
    }
}

impl<C: Component> Data for Has<C> {
    type State = component::Id;
    type Output = bool;

    fn init(
        registry: &component::Registry,
        _required: &mut Signature,
    ) -> Result<Self::State, EcsError> {
        registry.id::<C>()
    }

    #[inline]
    fn fetch(state: &component::Id, _entity: Entity, archetype: &Archetype, _row: Row) -> Option<bool> {
        Some(archetype.has_component(*state))
    }
}

impl<C: Component> Data for Maybe<C> {
    type State = component::Id;
    type Output = Option<C>;

    fn init(
        registry: &component::Registry,
        _required: &mut Signature,
    ) -> Result<Self::State, EcsError> {
        registry.id::<C>()
    }

    #[inline]
    fn fetch(
        state: &component::Id,
        _entity: Entity,
        archetype: &Archetype,
        row: Row,
    ) -> Option<Option<C>> {
        Some(archetype.get::<C>(*state, row).cloned())
    }
}

macro_rules! tuple_data {
    ($($name: ident),*) => {
        impl<$($name: Data),*> Data for ($($name,)*) {
            type State = ($($name::State,)*);
            type Output = ($($name::Output,)*);

            fn init(
                registry: &component::Registry,
                required: &mut Signature,
            ) -> Result<Self::State, EcsError> {
                Ok(($($name::init(registry, required)?,)*))
            }

            fn fetch(
                state: &Self::State,
                entity: Entity,
                archetype: &Archetype,
                row: Row,
            ) -> Option<Self::Output> {
                #[allow(non_snake_case)]
                let ($($name,)*) = state;
                Some(($($name::fetch($name, entity, archetype, row)?,)*))
            }
        }
    }
}

all_tuples!(tuple_data);

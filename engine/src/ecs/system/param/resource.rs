use super::Parameter;
use crate::ecs::{
    error::EcsError,
    resource::{Res, Resource},
    world::World,
};

/// The resource must be inserted before a system using it is added.
impl<T: Resource> Parameter for Res<T> {
    type Value<'w> = Res<T>;

    fn prepare(world: &mut World) -> Result<(), EcsError> {
        world.resource::<T>().map(|_| ())
    }

    fn fetch<'w>(world: &'w World) -> Result<Self::Value<'w>, EcsError> {
        world.resource::<T>()
    }
}

#[cfg(test)]
mod tests {
    use rusty_ecs_macros::Resource;

    use super::*;

    #[derive(Resource)]
    struct Clock(u64);

    #[test]
    fn missing_resource_fails_prepare() {
        // Given
        let mut world = World::new();

        // When
        let result = <Res<Clock>>::prepare(&mut world);

        // Then
        assert!(matches!(result, Err(EcsError::ResourceNotFound { .. })));
    }

    #[test]
    fn fetch_shares_the_inserted_value() {
        // Given
        let mut world = World::new();
        let inserted = world.insert_resource(Clock(1));

        // When
        let fetched = <Res<Clock>>::fetch(&world).unwrap();
        fetched.borrow_mut().0 = 2;

        // Then
        assert_eq!(inserted.borrow().0, 2);
    }
}

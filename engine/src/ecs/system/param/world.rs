use super::Parameter;
use crate::ecs::{error::EcsError, world::World};

impl Parameter for &World {
    type Value<'w> = &'w World;

    fn prepare(_world: &mut World) -> Result<(), EcsError> {
        Ok(())
    }

    fn fetch<'w>(world: &'w World) -> Result<Self::Value<'w>, EcsError> {
        Ok(world)
    }
}

use super::Parameter;
use crate::ecs::{
    error::EcsError,
    query::{Data, Filter, Query},
    world::World,
};

impl<F: Filter, D: Data> Parameter for &Query<F, D> {
    type Value<'w> = &'w Query<F, D>;

    fn prepare(world: &mut World) -> Result<(), EcsError> {
        world.query::<F, D>().map(|_| ())
    }

    fn fetch<'w>(world: &'w World) -> Result<Self::Value<'w>, EcsError> {
        world.cached_query::<F, D>()
    }
}

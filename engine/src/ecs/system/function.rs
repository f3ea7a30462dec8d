//! Function systems.
//!
//! [`WithSystemParams`] lets any function whose arguments are all [`Parameter`]s run against a
//! world. Systems are written with elided lifetimes:
//!
//! ```rust,ignore
//! fn movement(query: &Query<(), (Entity, Position, Velocity)>, commands: Commands) {
//!     for (entity, position, velocity) in query {
//!         commands.entity(*entity).insert(position.moved_by(velocity)).ok();
//!     }
//! }
//! ```
//!
//! At run time every parameter is fetched from the world with the world's borrow lifetime and the
//! function is called with those values. The higher ranked bound on `&mut Func` is what lets one
//! function accept both forms.

use crate::{
    all_tuples,
    ecs::{
        error::EcsError,
        system::{IntoSystem, System, param::Parameter},
        world::World,
    },
};

/// A function callable with system parameters `Params`.
pub trait WithSystemParams<Params>: 'static {
    /// Prepare every parameter against the world.
    fn prepare(world: &mut World) -> Result<(), EcsError>;

    /// Fetch every parameter and call the function. Nothing is called if a parameter fails.
    fn run(&mut self, world: &World) -> Result<(), EcsError>;
}

impl<Func> WithSystemParams<()> for Func
where
    Func: FnMut() + 'static,
{
    fn prepare(_world: &mut World) -> Result<(), EcsError> {
        Ok(())
    }

    fn run(&mut self, _world: &World) -> Result<(), EcsError> {
        self();
        Ok(())
    }
}

macro_rules! system_param_function {
    ($($param:ident),*) => {
        impl<Func, $($param: Parameter),*> WithSystemParams<($($param,)*)> for Func
        where
            Func: 'static,
            // The function must accept its declared parameter types and their fetched values at
            // any world lifetime.
            for<'a> &'a mut Func: FnMut($($param),*) + FnMut($($param::Value<'_>),*),
        {
            fn prepare(world: &mut World) -> Result<(), EcsError> {
                $($param::prepare(world)?;)*
                Ok(())
            }

            fn run(&mut self, world: &World) -> Result<(), EcsError> {
                // Macro hygiene keeps `self(..)` from taking the fetched values directly.
                #[allow(clippy::too_many_arguments, non_snake_case)]
                fn call_it<$($param),*>(mut func: impl FnMut($($param),*), $($param: $param),*) {
                    func($($param),*);
                }

                $(
                    #[allow(non_snake_case)]
                    let $param = $param::fetch(world)?;
                )*

                call_it(self, $($param),*);
                Ok(())
            }
        }
    };
}

all_tuples!(system_param_function);

impl<Func, Params> IntoSystem<Params> for Func
where
    Func: WithSystemParams<Params>,
    Params: 'static,
{
    fn into_system(mut self, world: &mut World) -> Result<System, EcsError> {
        Func::prepare(world)?;
        Ok(System::new(std::any::type_name::<Func>(), move |world| {
            self.run(world)
        }))
    }
}

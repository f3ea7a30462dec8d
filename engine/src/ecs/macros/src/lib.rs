mod component;
mod resource;

use proc_macro::TokenStream;

/// Derive [`Component`] for a struct or enum. The type must also implement `Clone`, since query
/// rows hold cloned snapshots of component values.
#[proc_macro_derive(Component)]
pub fn derive_component(item: TokenStream) -> TokenStream {
    component::derive_component(item)
}

#[proc_macro_derive(Resource)]
pub fn derive_resource(item: TokenStream) -> TokenStream {
    resource::derive_resource(item)
}

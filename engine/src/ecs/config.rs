//! Construction time limits for a [`World`](crate::ecs::World).

/// Default number of distinct component types a world can register. This is also the width of
/// every [`Signature`](crate::ecs::component::Signature) in the world.
pub const DEFAULT_MAX_COMPONENTS: usize = 32;

/// Default size of the entity pool.
pub const DEFAULT_MAX_ENTITIES: u32 = 4096;

/// Sizing for a world. Both limits are fixed for the world's lifetime.
///
/// ```rust,ignore
/// let world = World::with_config(WorldConfig::default().with_max_entities(100_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldConfig {
    max_components: usize,
    max_entities: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_components: DEFAULT_MAX_COMPONENTS,
            max_entities: DEFAULT_MAX_ENTITIES,
        }
    }
}

impl WorldConfig {
    /// Set the maximum number of component types (the signature width).
    #[inline]
    pub fn with_max_components(mut self, max_components: usize) -> Self {
        self.max_components = max_components;
        self
    }

    /// Set the maximum number of simultaneously reserved entities.
    #[inline]
    pub fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    #[inline]
    pub fn max_components(&self) -> usize {
        self.max_components
    }

    #[inline]
    pub fn max_entities(&self) -> u32 {
        self.max_entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        // When
        let config = WorldConfig::default();

        // Then
        assert_eq!(config.max_components(), 32);
        assert_eq!(config.max_entities(), 4096);
    }

    #[test]
    fn builder_overrides_limits() {
        // When
        let config = WorldConfig::default()
            .with_max_components(8)
            .with_max_entities(16);

        // Then
        assert_eq!(config.max_components(), 8);
        assert_eq!(config.max_entities(), 16);
    }
}

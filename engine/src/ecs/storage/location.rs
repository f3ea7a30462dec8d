use crate::ecs::storage::{Row, archetype};

/// Where a live entity's components are stored. The archetype id resolves to exactly one
/// signature, so a location also pins down the entity's component set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    archetype_id: archetype::Id,
    row: Row,
}

impl Location {
    #[inline]
    pub const fn new(archetype_id: archetype::Id, row: Row) -> Self {
        Self { archetype_id, row }
    }

    #[inline]
    pub fn archetype_id(&self) -> archetype::Id {
        self.archetype_id
    }

    #[inline]
    pub fn row(&self) -> Row {
        self.row
    }
}

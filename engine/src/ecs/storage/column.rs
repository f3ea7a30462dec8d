//! Type erased component columns.
//!
//! An archetype stores one [`Column`] per component in its signature. The trait object hides the
//! component type so that an archetype can hold any mix of columns; [`TypedColumn`] is the only
//! implementation and recovers the type by downcasting when values cross between columns.
//!
//! Rows are `Option<T>`: a freshly allocated row is uninitialized (`None`) until the component
//! value is written, which happens within the same apply step that allocated it.

use std::any::{Any, type_name};

use crate::ecs::{component, error::StorageError, storage::Row};

/// A type erased, growable array of one component type.
pub trait Column: Any {
    /// The component stored in this column.
    fn component_id(&self) -> component::Id;

    /// Number of rows, initialized or not.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow or shrink to `len` rows. New rows are uninitialized.
    fn resize(&mut self, len: usize);

    /// Append an uninitialized row.
    fn push(&mut self) {
        let len = self.len();
        self.resize(len + 1);
    }

    /// Drop the last row.
    fn pop(&mut self) {
        let len = self.len();
        self.resize(len.saturating_sub(1));
    }

    /// Remove `row` by moving the last row into its place, dropping the removed value.
    fn swap_remove(&mut self, row: Row) -> Result<(), StorageError>;

    /// Write a type erased value into an allocated row, replacing any previous value.
    fn set(&mut self, row: Row, value: Box<dyn Any>) -> Result<(), StorageError>;

    /// Whether `row` holds a value.
    fn is_initialized(&self, row: Row) -> bool;

    /// Move the value at `row` into `target_row` of `target`, leaving `row` uninitialized.
    fn move_to(
        &mut self,
        row: Row,
        target: &mut dyn Column,
        target_row: Row,
    ) -> Result<(), StorageError>;

    /// A new, empty column for the same component.
    fn empty_clone(&self) -> Box<dyn Column>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Column storage for component type `T`.
#[derive(Debug)]
pub struct TypedColumn<T> {
    id: component::Id,
    values: Vec<Option<T>>,
}

impl<T: 'static> TypedColumn<T> {
    pub fn new(id: component::Id) -> Self {
        Self {
            id,
            values: Vec::new(),
        }
    }

    /// Column factory recorded in the component registry.
    pub fn boxed(id: component::Id) -> Box<dyn Column> {
        Box::new(Self::new(id))
    }

    #[inline]
    pub fn get(&self, row: Row) -> Option<&T> {
        self.values.get(row.index()).and_then(Option::as_ref)
    }

    fn slot(&mut self, row: Row) -> Result<&mut Option<T>, StorageError> {
        let len = self.values.len();
        self.values
            .get_mut(row.index())
            .ok_or(StorageError::RowNotAllocated {
                row: row.index(),
                len,
            })
    }

    fn type_mismatch(&self) -> StorageError {
        StorageError::TypeMismatch {
            component: self.id,
            expected: type_name::<T>(),
        }
    }
}

impl<T: 'static> Column for TypedColumn<T> {
    #[inline]
    fn component_id(&self) -> component::Id {
        self.id
    }

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    fn resize(&mut self, len: usize) {
        self.values.resize_with(len, || None);
    }

    fn swap_remove(&mut self, row: Row) -> Result<(), StorageError> {
        if row.index() >= self.values.len() {
            return Err(StorageError::RowNotAllocated {
                row: row.index(),
                len: self.values.len(),
            });
        }
        self.values.swap_remove(row.index());
        Ok(())
    }

    fn set(&mut self, row: Row, value: Box<dyn Any>) -> Result<(), StorageError> {
        let value = value.downcast::<T>().map_err(|_| self.type_mismatch())?;
        *self.slot(row)? = Some(*value);
        Ok(())
    }

    #[inline]
    fn is_initialized(&self, row: Row) -> bool {
        self.get(row).is_some()
    }

    fn move_to(
        &mut self,
        row: Row,
        target: &mut dyn Column,
        target_row: Row,
    ) -> Result<(), StorageError> {
        let mismatch = self.type_mismatch();
        let target = target
            .as_any_mut()
            .downcast_mut::<TypedColumn<T>>()
            .ok_or(mismatch)?;
        let value = self.slot(row)?.take();
        *target.slot(target_row)? = value;
        Ok(())
    }

    fn empty_clone(&self) -> Box<dyn Column> {
        Self::boxed(self.id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//! Write-once state slots.

use crate::errors::StateConflictError;

/// A state field that can be written exactly once.
///
/// Writing to a populated slot raises a `StateConflictError` naming the
/// stage that owns the value.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    field: &'static str,
    value: Option<T>,
    owner: Option<String>,
}

impl<T> Slot<T> {
    /// Creates an empty slot for the named field.
    #[must_use]
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            value: None,
            owner: None,
        }
    }

    /// The field name.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Gets the value, if written.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The stage that wrote the value.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns true if the slot has been written.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Writes the value on behalf of `owner`.
    ///
    /// # Errors
    ///
    /// Returns `StateConflictError` if the slot was already written.
    pub fn set(&mut self, owner: impl Into<String>, value: T) -> Result<(), StateConflictError> {
        if let Some(existing) = &self.owner {
            return Err(StateConflictError::new(self.field, existing.clone()));
        }

        self.value = Some(value);
        self.owner = Some(owner.into());
        Ok(())
    }

    /// Consumes the slot, returning the value.
    #[must_use]
    pub fn into_inner(self) -> Option<T> {
        self.value
    }
}

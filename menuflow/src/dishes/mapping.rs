//! The dish name to recipe id mapping.

use crate::errors::MappingLoadError;
use std::collections::HashMap;
use std::path::Path;

/// Canonical dish names and their recipe ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishMapping {
    entries: HashMap<String, i64>,
}

impl DishMapping {
    /// Builds a mapping from `(name, id)` pairs.
    #[must_use]
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, id)| (name.to_string(), id))
                .collect(),
        }
    }

    /// Loads a JSON object `{"<dish name>": <id>, ...}`.
    ///
    /// # Errors
    ///
    /// Returns `MappingLoadError` if the file is missing or not such an object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| MappingLoadError::new(path, e.to_string()))?;
        let entries: HashMap<String, i64> = serde_json::from_str(&raw)
            .map_err(|e| MappingLoadError::new(path, e.to_string()))?;

        tracing::debug!(path = %path.display(), entries = entries.len(), "Loaded dish mapping");
        Ok(Self { entries })
    }

    /// Looks up the id of an exact dish name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries.get(name).copied()
    }

    /// Number of dishes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Candidate dish names and their resolved recipe ids.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Id of the fallback entry returned when no candidate resolves.
pub const NO_RECIPE_ID: i64 = 1;

/// Name of the fallback entry returned when no candidate resolves.
pub const NO_RECIPE_NAME: &str = "Nessuna ricetta";

/// Dish names shortlisted by the capability as answers to a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDishList {
    /// Candidate dish names, as written in the evidence.
    pub dishes: Vec<String>,
}

impl CandidateDishList {
    /// Creates a candidate list.
    #[must_use]
    pub fn new(dishes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            dishes: dishes.into_iter().map(Into::into).collect(),
        }
    }
}

/// A dish resolved to its canonical id.
///
/// Serializes as a single-entry map `{"<id>": "<name>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRecipe {
    /// Canonical recipe id.
    pub id: i64,
    /// Canonical dish name.
    pub name: String,
}

impl ResolvedRecipe {
    /// Creates a resolved recipe.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// The "no recipe found" fallback entry.
    #[must_use]
    pub fn no_recipe() -> Self {
        Self::new(NO_RECIPE_ID, NO_RECIPE_NAME)
    }

    /// Returns true if this is the fallback entry.
    #[must_use]
    pub fn is_no_recipe(&self) -> bool {
        self.id == NO_RECIPE_ID && self.name == NO_RECIPE_NAME
    }
}

impl Serialize for ResolvedRecipe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.id, &self.name)?;
        map.end()
    }
}

//! Menu documents as stored in the corpus, one per restaurant.

use serde::{Deserialize, Serialize};

/// A license held by a restaurant (e.g. `Psionica`, acronym `P`, level `3`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License name.
    pub name: String,
    /// License acronym (`P`, `G`, `e+`, `Mx`, `LTK`, `t`, `Q`, `c`).
    #[serde(default)]
    pub acronym: String,
    /// License level, kept as written in the menu.
    #[serde(default)]
    pub level: String,
}

/// A dish on a restaurant menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Dish name.
    pub name: String,
    /// Ingredients used.
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Preparation techniques used.
    #[serde(default)]
    pub techniques: Vec<String>,
}

impl Recipe {
    /// Creates a recipe.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        ingredients: impl IntoIterator<Item = impl Into<String>>,
        techniques: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            techniques: techniques.into_iter().map(Into::into).collect(),
        }
    }

    /// Text searched by the scanner: name, ingredients and techniques, one per line.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.ingredients.len() + self.techniques.len());
        parts.push(self.name.as_str());
        parts.extend(self.ingredients.iter().map(String::as_str));
        parts.extend(self.techniques.iter().map(String::as_str));
        parts.join("\n")
    }

    /// Returns true if every term occurs in the searchable text.
    ///
    /// Containment is a case-sensitive substring test.
    #[must_use]
    pub fn contains_all(&self, terms: &[String]) -> bool {
        let text = self.searchable_text();
        terms.iter().all(|term| text.contains(term.as_str()))
    }

    /// Returns true if at least one term occurs in the searchable text.
    #[must_use]
    pub fn contains_any(&self, terms: &[String]) -> bool {
        let text = self.searchable_text();
        terms.iter().any(|term| text.contains(term.as_str()))
    }
}

/// The parsed menu of one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDocument {
    /// Chef name.
    pub chef: String,
    /// Planet the restaurant is on.
    pub planet: String,
    /// Licenses held.
    #[serde(default)]
    pub licenses: Vec<License>,
    /// Dishes on the menu.
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl MenuDocument {
    /// Creates a document with no licenses or recipes.
    #[must_use]
    pub fn new(chef: impl Into<String>, planet: impl Into<String>) -> Self {
        Self {
            chef: chef.into(),
            planet: planet.into(),
            licenses: Vec::new(),
            recipes: Vec::new(),
        }
    }

    /// Adds a license.
    #[must_use]
    pub fn with_license(mut self, license: License) -> Self {
        self.licenses.push(license);
        self
    }

    /// Adds a recipe.
    #[must_use]
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curry() -> Recipe {
        Recipe::new("Curry Cosmico", ["riso basmati", "curry rosso"], ["Bollitura"])
    }

    #[test]
    fn test_contains_all_is_substring_based() {
        let recipe = curry();
        assert!(recipe.contains_all(&["curry".to_string(), "riso".to_string()]));
        assert!(recipe.contains_all(&["Cosmico".to_string()]));
        assert!(!recipe.contains_all(&["curry".to_string(), "pane".to_string()]));
    }

    #[test]
    fn test_containment_is_case_sensitive() {
        let recipe = curry();
        assert!(!recipe.contains_any(&["bollitura".to_string()]));
        assert!(recipe.contains_any(&["Bollitura".to_string()]));
    }

    #[test]
    fn test_terms_do_not_match_across_fields() {
        let recipe = Recipe::new("Zuppa", ["sale"], ["Frittura"]);
        assert!(!recipe.contains_any(&["saleFrittura".to_string()]));
    }

    #[test]
    fn test_document_deserializes_with_missing_lists() {
        let doc: MenuDocument =
            serde_json::from_str(r#"{"chef": "Aurelio", "planet": "Namecc"}"#).unwrap();
        assert_eq!(doc.chef, "Aurelio");
        assert!(doc.licenses.is_empty());
        assert!(doc.recipes.is_empty());
    }
}

//! Structured inclusion criteria extracted from a question.

use serde::{Deserialize, Serialize};

/// Inclusion criteria derived from a question.
///
/// Every list is optional: the capability omits the ones the question does not mention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Ingredients or techniques the dishes must contain.
    #[serde(default)]
    pub ingredients_or_techniques: Option<Vec<String>>,
    /// Chefs mentioned in the question.
    #[serde(default)]
    pub chefs: Option<Vec<String>>,
    /// Planets mentioned in the question.
    #[serde(default)]
    pub planets: Option<Vec<String>>,
    /// Restaurants mentioned in the question.
    #[serde(default, alias = "query_restaurants")]
    pub restaurants: Option<Vec<String>>,
}

impl FilterSet {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ingredient/technique terms.
    #[must_use]
    pub fn with_terms(mut self, terms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ingredients_or_techniques = Some(terms.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the chefs.
    #[must_use]
    pub fn with_chefs(mut self, chefs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.chefs = Some(chefs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the planets.
    #[must_use]
    pub fn with_planets(mut self, planets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.planets = Some(planets.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the restaurants.
    #[must_use]
    pub fn with_restaurants(
        mut self,
        restaurants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.restaurants = Some(restaurants.into_iter().map(Into::into).collect());
        self
    }

    /// The ingredient/technique terms, empty when absent.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        self.ingredients_or_techniques.as_deref().unwrap_or(&[])
    }

    /// Returns true if no list carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.ingredients_or_techniques,
            &self.chefs,
            &self.planets,
            &self.restaurants,
        ]
        .iter()
        .all(|list| list.as_ref().map_or(true, Vec::is_empty))
    }

    /// Trims every entry and drops blank ones; a list left empty stays `Some(vec![])`.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn clean(list: Option<Vec<String>>) -> Option<Vec<String>> {
            list.map(|items| {
                items
                    .into_iter()
                    .map(|item| item.trim().to_string())
                    .filter(|item| !item.is_empty())
                    .collect()
            })
        }

        Self {
            ingredients_or_techniques: clean(self.ingredients_or_techniques),
            chefs: clean(self.chefs),
            planets: clean(self.planets),
            restaurants: clean(self.restaurants),
        }
    }
}

//! Multi-field containment match over the menu corpus.

use super::evidence::Evidence;
use super::source::{CorpusEntry, CorpusSource};
use crate::core::FilterSet;
use crate::errors::CorpusReadError;

/// What a scan produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Identifiers of matching restaurants, in scan order.
    pub matched_restaurants: Vec<String>,
    /// Evidence snippets, contiguous per restaurant, in scan order.
    pub contexts: Vec<String>,
    /// Documents that could not be read and were skipped.
    pub skipped: Vec<CorpusReadError>,
}

impl ScanResult {
    /// Returns true if no restaurant matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matched_restaurants.is_empty()
    }
}

/// Applies a filter set to a corpus.
///
/// A document matches when at least one of its recipes contains every
/// ingredient/technique term. Chef, planet and restaurant filters are carried
/// in the filter set but do not narrow the scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusScanner;

impl CorpusScanner {
    /// Creates a scanner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Scans every document of `source`.
    ///
    /// Unreadable documents are logged, recorded in `skipped` and do not stop
    /// the scan.
    ///
    /// # Errors
    ///
    /// Returns `CorpusReadError` only if the source cannot be enumerated at all.
    pub fn scan(
        &self,
        filters: &FilterSet,
        source: &dyn CorpusSource,
    ) -> Result<ScanResult, CorpusReadError> {
        let entries = source.entries()?;
        let mut result = ScanResult::default();
        let terms = filters.terms();

        for entry in entries {
            match entry {
                Ok(entry) => {
                    if let Some(snippets) = Self::match_entry(&entry, terms) {
                        result.matched_restaurants.push(entry.identifier);
                        result.contexts.extend(snippets);
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        source = source.name(),
                        identifier = %err.identifier,
                        reason = %err.reason,
                        "Skipping unreadable corpus document"
                    );
                    result.skipped.push(err);
                }
            }
        }

        tracing::debug!(
            source = source.name(),
            terms = ?terms,
            matched = result.matched_restaurants.len(),
            skipped = result.skipped.len(),
            "Corpus scan finished"
        );

        Ok(result)
    }

    /// Returns the evidence block for `entry`, or `None` if it does not match.
    ///
    /// An empty term list matches nothing.
    #[must_use]
    pub fn match_entry(entry: &CorpusEntry, terms: &[String]) -> Option<Vec<String>> {
        if terms.is_empty() {
            return None;
        }

        let document = &entry.document;
        if !document.recipes.iter().any(|r| r.contains_all(terms)) {
            return None;
        }

        let mut snippets = vec![
            Evidence::RestaurantStart(&entry.identifier).to_string(),
            Evidence::Chef(&document.chef).to_string(),
            Evidence::Planet(&document.planet).to_string(),
            Evidence::Licenses(&document.licenses).to_string(),
        ];
        snippets.extend(
            document
                .recipes
                .iter()
                .filter(|r| r.contains_any(terms))
                .map(|r| Evidence::Recipe(r).to_string()),
        );
        snippets.push(Evidence::RestaurantEnd.to_string());
        Some(snippets)
    }
}

//! Keyword search over plain-text menus.
//!
//! Works on raw menu text rather than parsed documents: every occurrence
//! of a keyword yields the text leading up to and including it.

use super::source::identifier_from_file_name;
use crate::errors::CorpusReadError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default number of characters kept before each keyword occurrence.
pub const DEFAULT_CONTEXT_CHARS: usize = 1000;

/// Restaurants and context windows found by a keyword search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordHits {
    /// Restaurants containing at least one keyword, in search order.
    pub restaurants: Vec<String>,
    /// One window per occurrence.
    pub contexts: Vec<String>,
}

/// Returns one window per occurrence of `keyword` in `text`.
///
/// A window spans up to `context_chars` characters before the occurrence
/// and ends with the keyword. Overlapping occurrences are all reported. An
/// empty keyword yields nothing.
#[must_use]
pub fn keyword_contexts(text: &str, keyword: &str, context_chars: usize) -> Vec<String> {
    let mut windows = Vec::new();
    if keyword.is_empty() {
        return windows;
    }

    let mut from = 0;
    while let Some(offset) = text[from..].find(keyword) {
        let pos = from + offset;
        let start = text[..pos]
            .char_indices()
            .rev()
            .take(context_chars)
            .last()
            .map_or(pos, |(i, _)| i);
        windows.push(text[start..pos + keyword.len()].to_string());

        let step = text[pos..].chars().next().map_or(1, char::len_utf8);
        from = pos + step;
    }
    windows
}

/// A directory of plain-text menus, one file per restaurant.
#[derive(Debug, Clone)]
pub struct TextMenuSearch {
    dir: PathBuf,
    context_chars: usize,
}

impl TextMenuSearch {
    /// Creates a search over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            context_chars: DEFAULT_CONTEXT_CHARS,
        }
    }

    /// Sets the window size.
    #[must_use]
    pub const fn with_context_chars(mut self, context_chars: usize) -> Self {
        self.context_chars = context_chars;
        self
    }

    /// The menu directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads every menu as `(identifier, text)`, sorted by file name.
    ///
    /// Unreadable files are logged and skipped.
    fn menus(&self) -> Result<Vec<(String, String)>, CorpusReadError> {
        let listing = std::fs::read_dir(&self.dir).map_err(|e| {
            CorpusReadError::new(self.dir.display().to_string(), e.to_string()).with_path(&self.dir)
        })?;

        let mut paths: Vec<PathBuf> = listing
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut menus = Vec::with_capacity(paths.len());
        for path in paths {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let identifier = identifier_from_file_name(&file_name).to_string();
            match std::fs::read_to_string(&path) {
                Ok(text) => menus.push((identifier, text)),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable menu text"
                ),
            }
        }
        Ok(menus)
    }

    /// Finds every occurrence of every keyword.
    ///
    /// # Errors
    ///
    /// Returns `CorpusReadError` if the directory cannot be listed.
    pub fn search(&self, keywords: &[String]) -> Result<KeywordHits, CorpusReadError> {
        let mut hits = KeywordHits::default();

        for (identifier, text) in self.menus()? {
            let mut found = false;
            for keyword in keywords {
                let windows = keyword_contexts(&text, keyword, self.context_chars);
                found |= !windows.is_empty();
                hits.contexts.extend(windows);
            }
            if found && !hits.restaurants.contains(&identifier) {
                hits.restaurants.push(identifier);
            }
        }

        tracing::debug!(
            dir = %self.dir.display(),
            keywords = ?keywords,
            restaurants = hits.restaurants.len(),
            contexts = hits.contexts.len(),
            "Text menu search finished"
        );
        Ok(hits)
    }

    /// Lists restaurants whose menu contains `keyword` (`included`) or does
    /// not contain it (`!included`).
    ///
    /// # Errors
    ///
    /// Returns `CorpusReadError` if the directory cannot be listed.
    pub fn restaurants_with_keyword(
        &self,
        keyword: &str,
        included: bool,
    ) -> Result<Vec<String>, CorpusReadError> {
        let mut restaurants: Vec<String> = Vec::new();
        for (identifier, text) in self.menus()? {
            if text.contains(keyword) == included && !restaurants.contains(&identifier) {
                restaurants.push(identifier);
            }
        }
        Ok(restaurants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_context_window_ends_at_keyword() {
        let windows = keyword_contexts("antipasto: pizza fritta", "pizza", 5);
        assert_eq!(windows, vec!["sto: pizza".to_string()]);
    }

    #[test]
    fn test_context_window_clamped_at_start() {
        let windows = keyword_contexts("pizza e pizza", "pizza", 1000);
        assert_eq!(windows, vec!["pizza".to_string(), "pizza e pizza".to_string()]);
    }

    #[test]
    fn test_overlapping_occurrences() {
        assert_eq!(keyword_contexts("aaa", "aa", 0), vec!["aa", "aa"]);
    }

    #[test]
    fn test_multibyte_text_is_safe() {
        let windows = keyword_contexts("Crème brûlée al caffè", "caffè", 4);
        assert_eq!(windows, vec![" al caffè".to_string()]);
        assert!(keyword_contexts("brûlée", "", 3).is_empty());
    }

    #[test]
    fn test_search_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Beta.txt"), "Ramen con uova di drago").unwrap();
        std::fs::write(dir.path().join("Alfa.txt"), "Pizza margherita\nRamen").unwrap();
        std::fs::write(dir.path().join("Gamma.txt"), "Sushi").unwrap();

        let search = TextMenuSearch::new(dir.path()).with_context_chars(3);
        let hits = search.search(&["Ramen".to_string()]).unwrap();

        assert_eq!(hits.restaurants, vec!["Alfa".to_string(), "Beta".to_string()]);
        assert_eq!(hits.contexts, vec!["ta\nRamen".to_string(), "Ramen".to_string()]);

        let without = search.restaurants_with_keyword("Ramen", false).unwrap();
        assert_eq!(without, vec!["Gamma".to_string()]);
        let with = search.restaurants_with_keyword("Sushi", true).unwrap();
        assert_eq!(with, vec!["Gamma".to_string()]);
    }

    #[test]
    fn test_missing_directory() {
        let search = TextMenuSearch::new("/no/such/menus");
        assert!(search.search(&["pizza".to_string()]).is_err());
    }
}

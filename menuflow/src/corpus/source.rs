//! Corpus sources: enumerable, read-only collections of menu documents.

use crate::core::MenuDocument;
use crate::errors::CorpusReadError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A parsed menu paired with its restaurant identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// Restaurant identifier.
    pub identifier: String,
    /// The parsed menu.
    pub document: MenuDocument,
}

impl CorpusEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(identifier: impl Into<String>, document: MenuDocument) -> Self {
        Self {
            identifier: identifier.into(),
            document,
        }
    }
}

/// A collection of menu documents.
///
/// Each item is either a parsed entry or the error that prevented reading
/// it; the scanner skips errors and keeps going.
pub trait CorpusSource: Send + Sync {
    /// Source name used in logs.
    fn name(&self) -> &str;

    /// Enumerates the corpus in a deterministic order.
    ///
    /// # Errors
    ///
    /// Returns `CorpusReadError` if the collection itself cannot be listed.
    fn entries(&self) -> Result<Vec<Result<CorpusEntry, CorpusReadError>>, CorpusReadError>;
}

/// Derives the restaurant identifier from a file name: everything before the first `.`.
#[must_use]
pub fn identifier_from_file_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// A directory of `*.json` menus, one per restaurant.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    dir: PathBuf,
    sort_identifiers: bool,
}

impl DirectoryCorpus {
    /// Creates a source over `dir`, sorted by identifier.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sort_identifiers: true,
        }
    }

    /// Keeps the file system's enumeration order instead of sorting.
    #[must_use]
    pub const fn with_sorting(mut self, sort_identifiers: bool) -> Self {
        self.sort_identifiers = sort_identifiers;
        self
    }

    /// The corpus directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_entry(path: &Path, identifier: &str) -> Result<CorpusEntry, CorpusReadError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CorpusReadError::new(identifier, e.to_string()).with_path(path))?;
        let document: MenuDocument = serde_json::from_str(&raw)
            .map_err(|e| CorpusReadError::new(identifier, e.to_string()).with_path(path))?;
        Ok(CorpusEntry::new(identifier, document))
    }
}

impl CorpusSource for DirectoryCorpus {
    fn name(&self) -> &str {
        "directory"
    }

    fn entries(&self) -> Result<Vec<Result<CorpusEntry, CorpusReadError>>, CorpusReadError> {
        let listing = std::fs::read_dir(&self.dir).map_err(|e| {
            CorpusReadError::new(self.dir.display().to_string(), e.to_string()).with_path(&self.dir)
        })?;

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        let mut failures = Vec::new();
        for item in listing {
            match item {
                Ok(entry) => {
                    let path = entry.path();
                    let is_json = path.extension().is_some_and(|ext| ext == "json");
                    if !is_json || !path.is_file() {
                        continue;
                    }
                    let file_name = entry.file_name().to_string_lossy().into_owned();
                    files.push((identifier_from_file_name(&file_name).to_string(), path));
                }
                Err(e) => failures.push(Err(CorpusReadError::new(
                    self.dir.display().to_string(),
                    e.to_string(),
                ))),
            }
        }

        if self.sort_identifiers {
            files.sort();
        }

        let mut seen = HashSet::new();
        files.retain(|(identifier, path)| {
            let first = seen.insert(identifier.clone());
            if !first {
                tracing::warn!(
                    identifier = %identifier,
                    path = %path.display(),
                    "Skipping file with duplicate restaurant identifier"
                );
            }
            first
        });

        let mut entries: Vec<_> = files
            .iter()
            .map(|(identifier, path)| Self::read_entry(path, identifier))
            .collect();
        entries.extend(failures);
        Ok(entries)
    }
}

/// An in-memory corpus, enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    entries: Vec<Result<CorpusEntry, CorpusReadError>>,
}

impl InMemoryCorpus {
    /// Creates an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document.
    #[must_use]
    pub fn with_document(mut self, identifier: impl Into<String>, document: MenuDocument) -> Self {
        self.entries.push(Ok(CorpusEntry::new(identifier, document)));
        self
    }

    /// Adds an unreadable document.
    #[must_use]
    pub fn with_error(mut self, error: CorpusReadError) -> Self {
        self.entries.push(Err(error));
        self
    }

    /// Number of items, readable or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the corpus has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CorpusSource for InMemoryCorpus {
    fn name(&self) -> &str {
        "memory"
    }

    fn entries(&self) -> Result<Vec<Result<CorpusEntry, CorpusReadError>>, CorpusReadError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_json_corpus;

    #[test]
    fn test_identifier_from_file_name() {
        assert_eq!(identifier_from_file_name("Anima Cosmica.json"), "Anima Cosmica");
        assert_eq!(identifier_from_file_name("Sapori.v2.json"), "Sapori");
        assert_eq!(identifier_from_file_name("plain"), "plain");
    }

    #[test]
    fn test_directory_corpus_sorted_and_tolerant() {
        let dir = tempfile::tempdir().unwrap();
        write_json_corpus(
            dir.path(),
            &[
                ("Zeta", MenuDocument::new("Zed", "Krypton")),
                ("Alpha", MenuDocument::new("Ada", "Asgard")),
            ],
        )
        .unwrap();
        std::fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let entries = DirectoryCorpus::new(dir.path()).entries().unwrap();
        assert_eq!(entries.len(), 3);

        let ids: Vec<String> = entries
            .iter()
            .map(|e| match e {
                Ok(entry) => entry.identifier.clone(),
                Err(err) => format!("!{}", err.identifier),
            })
            .collect();
        assert_eq!(ids, vec!["Alpha", "!Broken", "Zeta"]);
    }

    #[test]
    fn test_directory_corpus_keeps_first_of_duplicate_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        write_json_corpus(dir.path(), &[("Sapori", MenuDocument::new("Primo", "Ego"))]).unwrap();
        std::fs::write(
            dir.path().join("Sapori.v2.json"),
            serde_json::to_string(&MenuDocument::new("Secondo", "Ego")).unwrap(),
        )
        .unwrap();

        let entries = DirectoryCorpus::new(dir.path()).entries().unwrap();

        assert_eq!(entries.len(), 1);
        let entry = entries[0].as_ref().unwrap();
        assert_eq!(entry.identifier, "Sapori");
        assert_eq!(entry.document.chef, "Primo");
    }

    #[test]
    fn test_directory_corpus_unsorted_reads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        write_json_corpus(
            dir.path(),
            &[
                ("Zeta", MenuDocument::new("Zed", "Krypton")),
                ("Alpha", MenuDocument::new("Ada", "Asgard")),
                ("Mu", MenuDocument::new("Mo", "Ego")),
            ],
        )
        .unwrap();

        let corpus = DirectoryCorpus::new(dir.path()).with_sorting(false);
        let mut ids: Vec<String> = corpus
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.unwrap().identifier)
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["Alpha", "Mu", "Zeta"]);
        assert_eq!(corpus.dir(), dir.path());
    }

    #[test]
    fn test_directory_corpus_missing_dir() {
        let err = DirectoryCorpus::new("/definitely/not/here").entries().unwrap_err();
        assert!(err.path.is_some());
    }

    #[test]
    fn test_in_memory_corpus_keeps_order() {
        let corpus = InMemoryCorpus::new()
            .with_document("B", MenuDocument::new("b", "Ego"))
            .with_document("A", MenuDocument::new("a", "Ego"));

        let ids: Vec<String> = corpus
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.unwrap().identifier)
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(corpus.len(), 2);
    }
}

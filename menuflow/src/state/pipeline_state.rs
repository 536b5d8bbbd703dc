//! The mutable record threaded through the stages of one run.

use super::{RunIdentity, Slot};
use crate::core::{FilterSet, ResolvedRecipe, StageKind, StageStatus};
use crate::corpus::ScanResult;
use crate::errors::{CorpusReadError, MenuflowError, StateConflictError};
use serde::Serialize;

/// Execution record for one stage of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    /// Stage name.
    pub stage: String,
    /// Stage kind.
    pub kind: StageKind,
    /// Final status.
    pub status: StageStatus,
    /// Wall time in milliseconds.
    pub duration_ms: f64,
    /// Error message when the stage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// State of one question-answering run.
///
/// The question is fixed at creation. Every other field is a write-once
/// slot owned by the stage that fills it.
#[derive(Debug, Clone)]
pub struct PipelineState {
    identity: RunIdentity,
    question: String,
    filter_set: Slot<FilterSet>,
    matched_restaurants: Slot<Vec<String>>,
    contexts: Slot<Vec<String>>,
    resolved_recipes: Slot<Vec<ResolvedRecipe>>,
    skipped_documents: Vec<CorpusReadError>,
    records: Vec<StageRecord>,
}

impl PipelineState {
    /// Creates the state for a question.
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self::with_identity(question, RunIdentity::new())
    }

    /// Creates the state with a caller-provided identity.
    #[must_use]
    pub fn with_identity(question: impl Into<String>, identity: RunIdentity) -> Self {
        Self {
            identity,
            question: question.into(),
            filter_set: Slot::new("filter_set"),
            matched_restaurants: Slot::new("matched_restaurants"),
            contexts: Slot::new("contexts"),
            resolved_recipes: Slot::new("resolved_recipes"),
            skipped_documents: Vec::new(),
            records: Vec::new(),
        }
    }

    /// The run identity.
    #[must_use]
    pub const fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// The original question.
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The extracted filter set, if the extractor has run.
    #[must_use]
    pub const fn filter_set(&self) -> Option<&FilterSet> {
        self.filter_set.get()
    }

    /// Restaurants matched by the scan, in scan order.
    #[must_use]
    pub fn matched_restaurants(&self) -> &[String] {
        self.matched_restaurants.get().map_or(&[], Vec::as_slice)
    }

    /// Evidence snippets, in scan order.
    #[must_use]
    pub fn contexts(&self) -> &[String] {
        self.contexts.get().map_or(&[], Vec::as_slice)
    }

    /// Returns true once the scan has written its outputs.
    #[must_use]
    pub const fn is_scanned(&self) -> bool {
        self.contexts.is_set()
    }

    /// The resolved recipes, if the resolver has run.
    #[must_use]
    pub fn resolved_recipes(&self) -> Option<&[ResolvedRecipe]> {
        self.resolved_recipes.get().map(Vec::as_slice)
    }

    /// Corpus documents the scan could not read.
    #[must_use]
    pub fn skipped_documents(&self) -> &[CorpusReadError] {
        &self.skipped_documents
    }

    /// Stage execution records, in run order.
    #[must_use]
    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    /// Stores the filter set.
    ///
    /// # Errors
    ///
    /// Returns `StateConflictError` if a filter set was already stored.
    pub fn set_filter_set(
        &mut self,
        owner: &str,
        filter_set: FilterSet,
    ) -> Result<(), StateConflictError> {
        self.filter_set.set(owner, filter_set)
    }

    /// Stores both scan outputs.
    ///
    /// # Errors
    ///
    /// Returns `StateConflictError` if either output was already stored; in
    /// that case neither field changes.
    pub fn set_scan_result(&mut self, owner: &str, scan: ScanResult) -> Result<(), StateConflictError> {
        if let Some(existing) = self.matched_restaurants.owner().or(self.contexts.owner()) {
            return Err(StateConflictError::new(self.contexts.field(), existing));
        }

        self.matched_restaurants.set(owner, scan.matched_restaurants)?;
        self.contexts.set(owner, scan.contexts)?;
        self.skipped_documents = scan.skipped;
        Ok(())
    }

    /// Stores the resolved recipes.
    ///
    /// # Errors
    ///
    /// Returns `StateConflictError` if recipes were already stored.
    pub fn set_resolved_recipes(
        &mut self,
        owner: &str,
        recipes: Vec<ResolvedRecipe>,
    ) -> Result<(), StateConflictError> {
        self.resolved_recipes.set(owner, recipes)
    }

    /// Appends a stage execution record.
    pub fn push_record(&mut self, record: StageRecord) {
        self.records.push(record);
    }

    /// Consumes the state, returning the resolved recipes.
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` if the resolver never wrote its output.
    pub fn into_resolved(self) -> Result<Vec<ResolvedRecipe>, MenuflowError> {
        self.resolved_recipes
            .into_inner()
            .ok_or_else(|| MenuflowError::missing_input("pipeline", "resolved_recipes"))
    }
}

//! Stage trait and the three pipeline stages.
//!
//! Each stage reads what earlier stages wrote to the [`PipelineState`] and
//! fills only its own slots.

use crate::core::StageKind;
use crate::corpus::{CorpusScanner, CorpusSource};
use crate::dishes::{DishNameResolver, RESOLVER_STAGE};
use crate::errors::MenuflowError;
use crate::extractor::{FilterExtractor, EXTRACTOR_STAGE};
use crate::state::PipelineState;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Stage name of the corpus scan.
pub const SCANNER_STAGE: &str = "corpus_scanner";

/// A unit of work in the pipeline.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Returns the kind of work the stage does.
    fn kind(&self) -> StageKind;

    /// Runs the stage against the shared state.
    async fn execute(&self, state: &mut PipelineState) -> Result<(), MenuflowError>;
}

/// Writes the filter set extracted from the question.
#[derive(Debug)]
pub struct FilterStage {
    extractor: FilterExtractor,
}

impl FilterStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(extractor: FilterExtractor) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Stage for FilterStage {
    fn name(&self) -> &str {
        EXTRACTOR_STAGE
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), MenuflowError> {
        let filters = self.extractor.extract(state.question()).await?;
        state.set_filter_set(self.name(), filters)?;
        Ok(())
    }
}

/// Scans the corpus with the extracted filter set.
pub struct ScanStage {
    scanner: CorpusScanner,
    source: Arc<dyn CorpusSource>,
}

impl Debug for ScanStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanStage")
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}

impl ScanStage {
    /// Creates the stage over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn CorpusSource>) -> Self {
        Self {
            scanner: CorpusScanner::new(),
            source,
        }
    }
}

#[async_trait]
impl Stage for ScanStage {
    fn name(&self) -> &str {
        SCANNER_STAGE
    }

    fn kind(&self) -> StageKind {
        StageKind::Enrich
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), MenuflowError> {
        let filters = state
            .filter_set()
            .ok_or_else(|| MenuflowError::missing_input(self.name(), "filter_set"))?;
        let result = self.scanner.scan(filters, self.source.as_ref())?;

        tracing::info!(
            matched = result.matched_restaurants.len(),
            contexts = result.contexts.len(),
            skipped = result.skipped.len(),
            "Corpus scanned"
        );
        state.set_scan_result(self.name(), result)?;
        Ok(())
    }
}

/// Resolves dish names found in the evidence to recipe ids.
#[derive(Debug)]
pub struct ResolveStage {
    resolver: DishNameResolver,
}

impl ResolveStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(resolver: DishNameResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Stage for ResolveStage {
    fn name(&self) -> &str {
        RESOLVER_STAGE
    }

    fn kind(&self) -> StageKind {
        StageKind::Agent
    }

    async fn execute(&self, state: &mut PipelineState) -> Result<(), MenuflowError> {
        if !state.is_scanned() {
            return Err(MenuflowError::missing_input(self.name(), "contexts"));
        }
        let resolved = self
            .resolver
            .resolve(state.question(), state.contexts())
            .await?;
        state.set_resolved_recipes(self.name(), resolved)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_corpus, ScriptedCapability};
    use serde_json::json;

    #[tokio::test]
    async fn test_scan_stage_requires_filter_set() {
        let stage = ScanStage::new(Arc::new(sample_corpus()));
        let mut state = PipelineState::new("q");

        let err = stage.execute(&mut state).await.unwrap_err();
        assert!(matches!(err, MenuflowError::MissingInput { ref field, .. } if field == "filter_set"));
    }

    #[tokio::test]
    async fn test_resolve_stage_requires_scan() {
        let capability = Arc::new(ScriptedCapability::new());
        let stage = ResolveStage::new(DishNameResolver::new(capability, "unused.json"));
        let mut state = PipelineState::new("q");

        let err = stage.execute(&mut state).await.unwrap_err();
        assert!(matches!(err, MenuflowError::MissingInput { ref field, .. } if field == "contexts"));
    }

    #[tokio::test]
    async fn test_filter_then_scan_stages() {
        let capability = Arc::new(
            ScriptedCapability::new().then_ok(json!({"ingredients_or_techniques": ["pizza"]})),
        );
        let filter = FilterStage::new(FilterExtractor::new(capability));
        let scan = ScanStage::new(Arc::new(sample_corpus()));
        let mut state = PipelineState::new("pizza?");

        filter.execute(&mut state).await.unwrap();
        scan.execute(&mut state).await.unwrap();

        assert_eq!(
            state.matched_restaurants(),
            ["Anima Cosmica".to_string(), "Datapizza".to_string()]
        );
        assert!(filter.execute(&mut state).await.is_err(), "filter set is write-once");
    }
}

//! Assembles the three-stage pipeline from its collaborators.

use super::MenuPipeline;
use crate::capability::{RetryConfig, RetryingCapability, TextCapability};
use crate::config::MenuflowConfig;
use crate::corpus::{CorpusSource, DirectoryCorpus};
use crate::dishes::DishNameResolver;
use crate::errors::{ConfigError, MenuflowError};
use crate::events::{EventSink, NoOpEventSink};
use crate::extractor::FilterExtractor;
use crate::stages::{FilterStage, ResolveStage, ScanStage, Stage};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for a [`MenuPipeline`].
///
/// The capability, corpus and mapping path are required. A retry policy,
/// when set, wraps the capability in a [`RetryingCapability`].
#[derive(Default)]
pub struct PipelineBuilder {
    capability: Option<Arc<dyn TextCapability>>,
    retry: Option<RetryConfig>,
    corpus: Option<Arc<dyn CorpusSource>>,
    mapping_path: Option<PathBuf>,
    sink: Option<Arc<dyn EventSink>>,
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("capability", &self.capability.as_ref().map(|c| c.name()))
            .field("retry", &self.retry)
            .field("corpus", &self.corpus.as_ref().map(|c| c.name()))
            .field("mapping_path", &self.mapping_path)
            .finish_non_exhaustive()
    }
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a configuration: directory corpus, mapping path and retry
    /// policy come from `config`.
    #[must_use]
    pub fn from_config(config: &MenuflowConfig) -> Self {
        let corpus = DirectoryCorpus::new(&config.corpus.json_dir)
            .with_sorting(config.corpus.sort_identifiers);
        Self::new()
            .corpus(Arc::new(corpus))
            .mapping_path(&config.mapping.path)
            .retry(config.retry.clone())
    }

    /// Sets the text capability.
    #[must_use]
    pub fn capability(mut self, capability: Arc<dyn TextCapability>) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Sets the retry policy for capability calls.
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    /// Sets the corpus.
    #[must_use]
    pub fn corpus(mut self, corpus: Arc<dyn CorpusSource>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    /// Sets the dish mapping file.
    #[must_use]
    pub fn mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = Some(path.into());
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a required collaborator is missing.
    pub fn build(self) -> Result<MenuPipeline, MenuflowError> {
        let missing = |what: &str| ConfigError::Invalid(format!("pipeline requires a {what}"));

        let capability = self.capability.ok_or_else(|| missing("capability"))?;
        let corpus = self.corpus.ok_or_else(|| missing("corpus"))?;
        let mapping_path = self.mapping_path.ok_or_else(|| missing("mapping path"))?;

        let capability: Arc<dyn TextCapability> = match self.retry {
            Some(retry) if retry.max_attempts > 1 => {
                Arc::new(RetryingCapability::new(capability, retry))
            }
            _ => capability,
        };

        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(FilterStage::new(FilterExtractor::new(capability.clone()))),
            Arc::new(ScanStage::new(corpus)),
            Arc::new(ResolveStage::new(DishNameResolver::new(
                capability,
                mapping_path,
            ))),
        ];

        let sink = self.sink.unwrap_or_else(|| Arc::new(NoOpEventSink));
        Ok(MenuPipeline::new(stages).with_event_sink(sink))
    }
}

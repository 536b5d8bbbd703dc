//! Pipeline lifecycle events.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent};

/// Emitted once before the first stage runs.
pub const PIPELINE_STARTED: &str = "pipeline.started";
/// Emitted after the last stage succeeds.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";
/// Emitted when a stage fails and the run stops.
pub const PIPELINE_FAILED: &str = "pipeline.failed";
/// Emitted before each stage.
pub const STAGE_STARTED: &str = "stage.started";
/// Emitted after a stage succeeds.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// Emitted when a stage returns an error.
pub const STAGE_FAILED: &str = "stage.failed";
/// Emitted for every corpus document the scanner skipped.
pub const DOCUMENT_SKIPPED: &str = "corpus.document_skipped";

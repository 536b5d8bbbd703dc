//! Sequential execution of the pipeline stages.

use crate::core::{ResolvedRecipe, StageStatus};
use crate::errors::MenuflowError;
use crate::events::{
    EventSink, NoOpEventSink, PipelineEvent, DOCUMENT_SKIPPED, PIPELINE_COMPLETED,
    PIPELINE_FAILED, PIPELINE_STARTED, STAGE_COMPLETED, STAGE_FAILED, STAGE_STARTED,
};
use crate::stages::Stage;
use crate::state::{PipelineState, StageRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Runs stages strictly in order over one [`PipelineState`] per question.
///
/// Holds no per-question data, so one pipeline can answer any number of
/// questions.
pub struct MenuPipeline {
    stages: Vec<Arc<dyn Stage>>,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for MenuPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuPipeline")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

impl MenuPipeline {
    /// Creates a pipeline from stages in execution order.
    #[must_use]
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self {
            stages,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Answers `question` with the resolved dishes.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn run(&self, question: &str) -> Result<Vec<ResolvedRecipe>, MenuflowError> {
        self.run_with_state(question).await?.into_resolved()
    }

    /// Answers `question`, returning the whole final state.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub async fn run_with_state(&self, question: &str) -> Result<PipelineState, MenuflowError> {
        self.execute(PipelineState::new(question)).await
    }

    /// Runs every stage over `state`.
    ///
    /// # Errors
    ///
    /// Returns the first stage error; later stages do not run.
    pub async fn execute(&self, state: PipelineState) -> Result<PipelineState, MenuflowError> {
        let span = tracing::info_span!(
            "pipeline",
            run_id = %state.identity().run_id,
        );
        self.execute_inner(state).instrument(span).await
    }

    async fn emit(&self, state: &PipelineState, event_type: &str, data: serde_json::Value) {
        self.sink
            .emit(PipelineEvent::new(event_type, state.identity().run_id, data))
            .await;
    }

    async fn execute_inner(&self, mut state: PipelineState) -> Result<PipelineState, MenuflowError> {
        let start = Instant::now();
        tracing::info!(question = %state.question(), stages = self.stages.len(), "Pipeline started");
        self.emit(
            &state,
            PIPELINE_STARTED,
            serde_json::json!({
                "question": state.question(),
                "stages": self.stage_names(),
                "run": state.identity().to_dict(),
            }),
        )
        .await;

        for stage in &self.stages {
            let name = stage.name().to_string();
            self.emit(&state, STAGE_STARTED, serde_json::json!({"stage": &name}))
                .await;

            let skipped_before = state.skipped_documents().len();
            let stage_start = Instant::now();
            let outcome = stage
                .execute(&mut state)
                .instrument(tracing::info_span!("stage", stage = %name))
                .await;
            let duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;

            match outcome {
                Ok(()) => {
                    state.push_record(StageRecord {
                        stage: name.clone(),
                        kind: stage.kind(),
                        status: StageStatus::Ok,
                        duration_ms,
                        error: None,
                    });

                    let skipped: Vec<serde_json::Value> = state.skipped_documents()
                        [skipped_before..]
                        .iter()
                        .map(|e| serde_json::json!(e.to_dict()))
                        .collect();
                    for payload in skipped {
                        self.emit(&state, DOCUMENT_SKIPPED, payload).await;
                    }

                    tracing::info!(stage = %name, duration_ms, "Stage completed");
                    self.emit(
                        &state,
                        STAGE_COMPLETED,
                        serde_json::json!({"stage": &name, "duration_ms": duration_ms}),
                    )
                    .await;
                }
                Err(err) => {
                    state.push_record(StageRecord {
                        stage: name.clone(),
                        kind: stage.kind(),
                        status: StageStatus::Fail,
                        duration_ms,
                        error: Some(err.to_string()),
                    });

                    tracing::error!(stage = %name, error = %err, "Stage failed");
                    self.emit(
                        &state,
                        STAGE_FAILED,
                        serde_json::json!({
                            "stage": &name,
                            "duration_ms": duration_ms,
                            "error": err.to_dict(),
                        }),
                    )
                    .await;
                    self.emit(
                        &state,
                        PIPELINE_FAILED,
                        serde_json::json!({
                            "stage": &name,
                            "duration_ms": start.elapsed().as_secs_f64() * 1000.0,
                        }),
                    )
                    .await;
                    return Err(err);
                }
            }
        }

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        let resolved = state.resolved_recipes().map_or(0, <[ResolvedRecipe]>::len);
        tracing::info!(duration_ms, resolved, "Pipeline completed");
        self.emit(
            &state,
            PIPELINE_COMPLETED,
            serde_json::json!({"duration_ms": duration_ms, "resolved": resolved}),
        )
        .await;

        Ok(state)
    }
}

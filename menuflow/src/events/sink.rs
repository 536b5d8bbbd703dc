//! Event sink trait and implementations.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, Level};
use uuid::Uuid;

/// A pipeline lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineEvent {
    /// Event type, e.g. `stage.completed`.
    pub event_type: String,
    /// The run this event belongs to.
    pub run_id: Uuid,
    /// Event payload.
    pub data: serde_json::Value,
}

impl PipelineEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(event_type: impl Into<String>, run_id: Uuid, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            run_id,
            data,
        }
    }
}

/// Receives pipeline events.
///
/// Emitting must never fail the pipeline; sinks swallow their own errors.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event.
    async fn emit(&self, event: PipelineEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: PipelineEvent) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink logging at `level` (DEBUG, or INFO for anything else).
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        if self.level == Level::DEBUG {
            debug!(
                event_type = %event.event_type,
                run_id = %event.run_id,
                event_data = %event.data,
                "Event: {}", event.event_type
            );
        } else {
            info!(
                event_type = %event.event_type,
                run_id = %event.run_id,
                event_data = %event.data,
                "Event: {}", event.event_type
            );
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.read().clone()
    }

    /// Returns the collected event types, in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Returns events whose type starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<PipelineEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type.starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        self.events.write().push(event);
    }
}

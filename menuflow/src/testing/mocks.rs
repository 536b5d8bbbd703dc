//! Mock capabilities for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use crate::capability::{OutputSchema, TextCapability};
use crate::errors::CapabilityError;

/// A capability that replays scripted responses and records every prompt.
///
/// Queued responses are consumed first, in order. Once the queue is empty,
/// a fixed response registered for the requested schema is returned; with
/// neither available the call fails with `Unavailable`.
#[derive(Debug, Default)]
pub struct ScriptedCapability {
    queue: Mutex<VecDeque<Result<serde_json::Value, CapabilityError>>>,
    fixed: HashMap<String, serde_json::Value>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCapability {
    /// Creates a capability with no responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    #[must_use]
    pub fn then_ok(self, value: serde_json::Value) -> Self {
        self.queue.lock().push_back(Ok(value));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn then_err(self, error: CapabilityError) -> Self {
        self.queue.lock().push_back(Err(error));
        self
    }

    /// Answers every request for `schema` with `value` once the queue is drained.
    #[must_use]
    pub fn always(mut self, schema: impl Into<String>, value: serde_json::Value) -> Self {
        self.fixed.insert(schema.into(), value);
        self
    }

    /// Number of invocations so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Prompts received, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextCapability for ScriptedCapability {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, CapabilityError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(next) = self.queue.lock().pop_front() {
            return next;
        }

        self.fixed.get(schema.name()).cloned().ok_or_else(|| {
            CapabilityError::unavailable(
                "scripted",
                format!("no scripted response for '{}'", schema.name()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_fixed_then_unavailable() {
        let capability = ScriptedCapability::new()
            .then_ok(json!({"dishes": ["Primo"]}))
            .always("CandidateDishList", json!({"dishes": ["Sempre"]}));
        let dishes = OutputSchema::candidate_dishes();

        assert_eq!(
            capability.invoke("a", &dishes).await.unwrap(),
            json!({"dishes": ["Primo"]})
        );
        assert_eq!(
            capability.invoke("b", &dishes).await.unwrap(),
            json!({"dishes": ["Sempre"]})
        );
        assert!(capability
            .invoke("c", &OutputSchema::filter_set())
            .await
            .is_err());
        assert_eq!(capability.call_count(), 3);
    }
}

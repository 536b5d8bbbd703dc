//! The external text-understanding capability.
//!
//! The pipeline treats the capability as a black box that turns a prompt
//! plus an output schema into an instance of that schema. This module
//! provides:
//! - The `TextCapability` trait and a typed extraction helper
//! - Output schemas for filter sets and candidate dish lists
//! - Prompt templates
//! - A bounded retry wrapper
//! - An HTTP adapter for OpenAI-compatible chat-completion endpoints

#[cfg(feature = "http")]
mod http;
mod prompt;
mod retry;
mod schema;

use crate::errors::CapabilityError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[cfg(feature = "http")]
pub use http::HttpCapability;
pub use prompt::PromptTemplate;
pub use retry::{with_retry, BackoffStrategy, JitterStrategy, RetryConfig, RetryingCapability};
pub use schema::{parse_json_content, OutputSchema, CANDIDATE_DISHES_SCHEMA, FILTER_SET_SCHEMA};

/// A structured-extraction capability.
#[async_trait]
pub trait TextCapability: Send + Sync {
    /// Provider name used in logs and errors.
    fn name(&self) -> &str;

    /// Sends a prompt and returns the raw JSON value produced for `schema`.
    ///
    /// Implementations should not retry; wrap them in a [`RetryingCapability`].
    async fn invoke(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, CapabilityError>;
}

/// Invokes the capability and parses the result into `T`.
///
/// # Errors
///
/// Returns the capability error, or `SchemaViolation` if the value does not
/// fit the schema.
pub async fn extract_structured<T: DeserializeOwned>(
    capability: &dyn TextCapability,
    prompt: &str,
    schema: &OutputSchema,
) -> Result<T, CapabilityError> {
    let value = capability.invoke(prompt, schema).await?;
    tracing::debug!(
        provider = capability.name(),
        schema = schema.name(),
        prompt_chars = prompt.chars().count(),
        "Capability returned structured output"
    );
    schema.parse(value)
}

//! HTTP adapter for OpenAI-compatible chat-completion endpoints.

use super::{parse_json_content, OutputSchema, TextCapability};
use crate::config::CapabilityConfig;
use crate::errors::{CapabilityError, ConfigError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;

const PROVIDER: &str = "http";

/// Calls `{endpoint}/chat/completions` requesting `json_schema` output.
pub struct HttpCapability {
    client: reqwest::Client,
    config: CapabilityConfig,
    api_key: Option<String>,
}

impl std::fmt::Debug for HttpCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCapability")
            .field("endpoint", &self.config.endpoint)
            .field("model_id", &self.config.model_id)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl HttpCapability {
    /// Creates the adapter, reading the API key from the configured
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the HTTP client cannot be built.
    pub fn new(config: CapabilityConfig) -> Result<Self, ConfigError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::with_api_key(config, api_key)
    }

    /// Creates the adapter with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the HTTP client cannot be built.
    pub fn with_api_key(
        config: CapabilityConfig,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        if api_key.is_none() {
            tracing::warn!(
                env = %config.api_key_env,
                "No API key configured; requests will be sent unauthenticated"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    /// Builds the request body for a prompt.
    #[must_use]
    pub fn request_body(&self, prompt: &str, schema: &OutputSchema) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": &self.config.model_id,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name(),
                    "description": schema.description(),
                    "schema": schema.schema(),
                    "strict": false,
                }
            }
        });

        if let Some(ref project_id) = self.config.project_id {
            body["project_id"] = serde_json::json!(project_id);
        }

        body
    }
}

#[async_trait]
impl TextCapability for HttpCapability {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn invoke(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, CapabilityError> {
        let start = Instant::now();
        let mut request = self.client.post(self.url()).json(&self.request_body(prompt, schema));
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CapabilityError::unavailable(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(500).collect();
            return Err(CapabilityError::unavailable_status(
                PROVIDER,
                status.as_u16(),
                excerpt,
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| CapabilityError::unavailable(PROVIDER, e.to_string()))?;

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            CapabilityError::schema_violation(schema.name(), format!("unexpected response body: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                CapabilityError::schema_violation(schema.name(), "response contains no message content")
            })?;

        tracing::debug!(
            model = %self.config.model_id,
            schema = schema.name(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            content_chars = content.chars().count(),
            "Chat completion received"
        );

        parse_json_content(schema.name(), &content)
    }
}

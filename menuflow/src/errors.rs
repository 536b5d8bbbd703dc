//! Error types for the menuflow pipeline.
//!
//! The taxonomy separates failures of the external text capability, corpus
//! read problems (tolerated by the scanner), mapping load problems (fatal to
//! resolution) and programming errors such as double writes to the state.

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for menuflow operations.
#[derive(Debug, Error)]
pub enum MenuflowError {
    /// The text capability could not produce a valid structured result.
    #[error("Extraction failed in stage '{stage}': {source}")]
    ExtractionFailed {
        /// The stage that requested the extraction.
        stage: String,
        /// The underlying capability error.
        #[source]
        source: CapabilityError,
    },

    /// A corpus document could not be read or parsed.
    #[error("{0}")]
    CorpusRead(#[from] CorpusReadError),

    /// The dish name mapping could not be loaded.
    #[error("{0}")]
    MappingLoad(#[from] MappingLoadError),

    /// A stage tried to overwrite an already populated state field.
    #[error("{0}")]
    StateConflict(#[from] StateConflictError),

    /// Invalid or unreadable configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A stage ran before the state field it reads was written.
    #[error("Stage '{stage}' requires '{field}' which has not been written yet")]
    MissingInput {
        /// The stage name.
        stage: String,
        /// The missing state field.
        field: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MenuflowError {
    /// Wraps a capability error raised while running `stage`.
    #[must_use]
    pub fn extraction_failed(stage: impl Into<String>, source: CapabilityError) -> Self {
        Self::ExtractionFailed {
            stage: stage.into(),
            source,
        }
    }

    /// Creates a missing input error.
    #[must_use]
    pub fn missing_input(stage: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingInput {
            stage: stage.into(),
            field: field.into(),
        }
    }

    /// Returns a short machine-readable kind for event payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ExtractionFailed { .. } => "ExtractionFailed",
            Self::CorpusRead(_) => "CorpusReadError",
            Self::MappingLoad(_) => "MappingLoadError",
            Self::StateConflict(_) => "StateConflict",
            Self::Config(_) => "ConfigError",
            Self::MissingInput { .. } => "MissingInput",
            Self::Io(_) => "IoError",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        if let Self::ExtractionFailed { stage, source } = self {
            map.insert("stage".to_string(), serde_json::json!(stage));
            map.insert("retryable".to_string(), serde_json::json!(source.is_retryable()));
        }
        map
    }
}

/// Errors raised by the external text-understanding capability.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The capability could not be reached or refused the request.
    #[error("Capability unavailable ({provider}): {reason}")]
    Unavailable {
        /// The provider name.
        provider: String,
        /// The reason for failure.
        reason: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
    },

    /// The capability answered, but not with an instance of the requested schema.
    #[error("Schema violation for '{schema}': {reason}")]
    SchemaViolation {
        /// The schema name.
        schema: String,
        /// What was wrong with the payload.
        reason: String,
    },
}

impl CapabilityError {
    /// Creates an unavailable error without an HTTP status.
    #[must_use]
    pub fn unavailable(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            reason: reason.into(),
            status: None,
        }
    }

    /// Creates an unavailable error carrying the HTTP status.
    #[must_use]
    pub fn unavailable_status(
        provider: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            reason: reason.into(),
            status: Some(status),
        }
    }

    /// Creates a schema violation error.
    #[must_use]
    pub fn schema_violation(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Client errors other than rate limiting are final.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { status: None, .. } => true,
            Self::Unavailable {
                status: Some(code), ..
            } => *code == 429 || *code >= 500,
            Self::SchemaViolation { .. } => false,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::Unavailable {
                provider,
                reason,
                status,
            } => {
                map.insert("type".to_string(), serde_json::json!("CapabilityUnavailable"));
                map.insert("provider".to_string(), serde_json::json!(provider));
                map.insert("reason".to_string(), serde_json::json!(reason));
                if let Some(code) = status {
                    map.insert("status".to_string(), serde_json::json!(code));
                }
            }
            Self::SchemaViolation { schema, reason } => {
                map.insert("type".to_string(), serde_json::json!("SchemaViolation"));
                map.insert("schema".to_string(), serde_json::json!(schema));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when a corpus document cannot be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Corpus document '{identifier}' unreadable: {reason}")]
pub struct CorpusReadError {
    /// The restaurant identifier (or file name when no identifier could be derived).
    pub identifier: String,
    /// The source path, if the document came from disk.
    pub path: Option<PathBuf>,
    /// The reason for failure.
    pub reason: String,
}

impl CorpusReadError {
    /// Creates a new corpus read error.
    #[must_use]
    pub fn new(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            path: None,
            reason: reason.into(),
        }
    }

    /// Sets the source path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("identifier".to_string(), serde_json::json!(self.identifier));
        map.insert("reason".to_string(), serde_json::json!(self.reason));
        if let Some(ref path) = self.path {
            map.insert("path".to_string(), serde_json::json!(path.display().to_string()));
        }
        map
    }
}

/// Error raised when the dish name mapping cannot be loaded.
#[derive(Debug, Clone, Error)]
#[error("Dish mapping '{}' could not be loaded: {reason}", path.display())]
pub struct MappingLoadError {
    /// The mapping path.
    pub path: PathBuf,
    /// The reason for failure.
    pub reason: String,
}

impl MappingLoadError {
    /// Creates a new mapping load error.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised when writing to an already populated state field.
#[derive(Debug, Clone, Error)]
#[error("State conflict: field '{field}' was already written by stage '{owner}'")]
pub struct StateConflictError {
    /// The conflicting field.
    pub field: String,
    /// The stage that wrote the field first.
    pub owner: String,
}

impl StateConflictError {
    /// Creates a new state conflict error.
    #[must_use]
    pub fn new(field: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            owner: owner.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Cannot read config file '{}': {source}", path.display())]
    Read {
        /// The config path.
        path: PathBuf,
        /// The IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the config shape.
    #[error("Cannot parse config file '{}': {source}", path.display())]
    Parse {
        /// The config path.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A value is out of range or an environment override is malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_error_retryable() {
        assert!(CapabilityError::unavailable("http", "connection reset").is_retryable());
        assert!(CapabilityError::unavailable_status("http", 503, "busy").is_retryable());
        assert!(CapabilityError::unavailable_status("http", 429, "slow down").is_retryable());
        assert!(!CapabilityError::unavailable_status("http", 401, "bad key").is_retryable());
        assert!(!CapabilityError::schema_violation("FilterSet", "not json").is_retryable());
    }

    #[test]
    fn test_capability_error_to_dict() {
        let err = CapabilityError::unavailable_status("http", 502, "bad gateway");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "CapabilityUnavailable");
        assert_eq!(dict.get("status").unwrap(), 502);
    }

    #[test]
    fn test_extraction_failed_display() {
        let err = MenuflowError::extraction_failed(
            "filter_extractor",
            CapabilityError::schema_violation("FilterSet", "missing field"),
        );

        let message = err.to_string();
        assert!(message.contains("filter_extractor"));
        assert!(message.contains("FilterSet"));
        assert_eq!(err.kind(), "ExtractionFailed");
        assert_eq!(err.to_dict().get("retryable").unwrap(), false);
    }

    #[test]
    fn test_corpus_read_error_to_dict() {
        let err = CorpusReadError::new("Bistrot", "expected value at line 1").with_path("/menus/Bistrot.json");
        let dict = err.to_dict();

        assert_eq!(dict.get("identifier").unwrap(), "Bistrot");
        assert_eq!(dict.get("path").unwrap(), "/menus/Bistrot.json");
    }

    #[test]
    fn test_state_conflict_from() {
        let err: MenuflowError = StateConflictError::new("contexts", "corpus_scanner").into();
        assert_eq!(err.kind(), "StateConflict");
        assert!(err.to_string().contains("contexts"));
    }
}

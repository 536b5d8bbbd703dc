//! Stage status and kind enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work a stage performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Turns the question into structured data (filter extraction).
    Transform,
    /// Adds evidence to the state (corpus scan).
    Enrich,
    /// Produces the final answer (dish resolution).
    Agent,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform => write!(f, "transform"),
            Self::Enrich => write!(f, "enrich"),
            Self::Agent => write!(f, "agent"),
        }
    }
}

/// The execution status of a stage within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage completed successfully.
    Ok,
    /// Stage failed.
    Fail,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_display() {
        assert_eq!(StageKind::Transform.to_string(), "transform");
        assert_eq!(StageKind::Enrich.to_string(), "enrich");
        assert_eq!(StageKind::Agent.to_string(), "agent");
    }

    #[test]
    fn test_stage_status_display() {
        assert_eq!(StageStatus::Ok.to_string(), "ok");
        assert_eq!(StageStatus::Fail.to_string(), "fail");
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Ok).unwrap();
        assert_eq!(json, r#""ok""#);

        let deserialized: StageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageStatus::Ok);
    }
}

//! Per-question pipeline state.
//!
//! This module provides:
//! - Write-once slots that keep each stage's output owned by that stage
//! - The run identity used to correlate logs and events
//! - The state record threaded through the stages of one run

mod identity;
mod pipeline_state;
mod slot;

pub use identity::RunIdentity;
pub use pipeline_state::{PipelineState, StageRecord};
pub use slot::Slot;

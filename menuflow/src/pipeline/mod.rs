//! Pipeline assembly and execution.
//!
//! This module provides:
//! - `MenuPipeline`, the sequential orchestrator
//! - `PipelineBuilder`, which wires the three stages together

mod builder;
mod orchestrator;

#[cfg(test)]
mod integration_tests;

pub use builder::PipelineBuilder;
pub use orchestrator::MenuPipeline;

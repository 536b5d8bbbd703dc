//! Testing utilities for menuflow pipelines.
//!
//! This module provides:
//! - A scripted `TextCapability`
//! - Sample corpora and dish mappings, in memory or written to disk

mod fixtures;
mod mocks;

pub use fixtures::{
    sample_corpus, sample_documents, sample_mapping, write_json_corpus, write_mapping,
};
pub use mocks::ScriptedCapability;

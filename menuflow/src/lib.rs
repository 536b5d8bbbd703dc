//! # Menuflow
//!
//! Answers natural-language questions about a fictional restaurant universe
//! with the dishes that satisfy them.
//!
//! A question flows through three stages:
//!
//! - **Filter extraction**: a text capability turns the question into a
//!   [`FilterSet`](core::FilterSet) of inclusion criteria
//! - **Corpus scan**: per-restaurant menus are matched against the filter
//!   terms, building an ordered evidence trail
//! - **Dish resolution**: the capability shortlists dish names from the
//!   evidence, which are then mapped to canonical recipe ids
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use menuflow::prelude::*;
//!
//! let config = MenuflowConfig::load(None)?;
//! let capability = Arc::new(HttpCapability::new(config.capability.clone())?);
//!
//! let pipeline = PipelineBuilder::from_config(&config)
//!     .capability(capability)
//!     .build()?;
//!
//! let dishes = pipeline.run("Quali piatti usano il curry e il riso?").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod capability;
pub mod config;
pub mod core;
pub mod corpus;
pub mod dishes;
pub mod errors;
pub mod events;
pub mod extractor;
pub mod pipeline;
pub mod stages;
pub mod state;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "http")]
    pub use crate::capability::HttpCapability;
    pub use crate::capability::{
        OutputSchema, RetryConfig, RetryingCapability, TextCapability,
    };
    pub use crate::config::MenuflowConfig;
    pub use crate::core::{
        CandidateDishList, FilterSet, MenuDocument, Recipe, ResolvedRecipe, StageKind,
        StageStatus,
    };
    pub use crate::corpus::{
        CorpusScanner, CorpusSource, DirectoryCorpus, InMemoryCorpus, ScanResult,
        TextMenuSearch,
    };
    pub use crate::dishes::{DishMapping, DishNameResolver};
    pub use crate::errors::{CapabilityError, MenuflowError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::extractor::FilterExtractor;
    pub use crate::pipeline::{MenuPipeline, PipelineBuilder};
    pub use crate::stages::Stage;
    pub use crate::state::PipelineState;
}

//! Core domain model types for menuflow.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Menu documents, recipes and licenses read from the corpus
//! - The filter set extracted from a question
//! - Candidate and resolved dish names
//! - Stage kind and status enums

mod filters;
mod menu;
mod recipes;
mod status;

pub use filters::FilterSet;
pub use menu::{License, MenuDocument, Recipe};
pub use recipes::{CandidateDishList, ResolvedRecipe, NO_RECIPE_ID, NO_RECIPE_NAME};
pub use status::{StageKind, StageStatus};

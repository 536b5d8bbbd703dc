//! Candidate shortlisting and id resolution.

use super::DishMapping;
use crate::capability::{extract_structured, OutputSchema, PromptTemplate, TextCapability};
use crate::core::{CandidateDishList, ResolvedRecipe};
use crate::errors::MenuflowError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stage name used in errors and logs.
pub const RESOLVER_STAGE: &str = "dish_name_resolver";

const SHORTLIST_PROMPT: &str = "Sei un cercatore di ricette. \
Ti viene fornita una lista di contesti e devi trovare le ricette che sono correlate alla domanda in base ai contesti. \
Restituisci i nomi delle ricette esattamente come compaiono nei contesti.\n\n\
<domanda>\n{domanda}\n</domanda>\n\n\
<contexts>\n{contexts}\n</contexts>";

/// Turns candidate names into resolved recipes.
///
/// Candidates are deduplicated by exact name, looked up in `mapping` and kept
/// in first-occurrence order. Misses are dropped. A second name mapping to an
/// id already emitted is dropped with a warning. If nothing resolves, the
/// result is the single "no recipe" entry.
#[must_use]
pub fn resolve_candidates(candidates: &[String], mapping: &DishMapping) -> Vec<ResolvedRecipe> {
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_ids: HashSet<i64> = HashSet::new();
    let mut resolved = Vec::new();

    for name in candidates {
        if !seen_names.insert(name.as_str()) {
            continue;
        }
        let Some(id) = mapping.get(name) else {
            tracing::debug!(candidate = %name, "Dropping candidate missing from dish mapping");
            continue;
        };
        if !seen_ids.insert(id) {
            tracing::warn!(
                candidate = %name,
                id,
                "Dish mapping assigns an id already resolved to another name; dropping"
            );
            continue;
        }
        resolved.push(ResolvedRecipe::new(id, name.clone()));
    }

    if resolved.is_empty() {
        resolved.push(ResolvedRecipe::no_recipe());
    }
    resolved
}

/// Shortlists candidate dish names with the capability, then resolves them
/// against the mapping file.
pub struct DishNameResolver {
    capability: Arc<dyn TextCapability>,
    mapping_path: PathBuf,
    template: PromptTemplate,
    schema: OutputSchema,
}

impl std::fmt::Debug for DishNameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DishNameResolver")
            .field("capability", &self.capability.name())
            .field("mapping_path", &self.mapping_path)
            .finish_non_exhaustive()
    }
}

impl DishNameResolver {
    /// Creates a resolver reading the mapping from `mapping_path` on every call.
    #[must_use]
    pub fn new(capability: Arc<dyn TextCapability>, mapping_path: impl Into<PathBuf>) -> Self {
        Self {
            capability,
            mapping_path: mapping_path.into(),
            template: PromptTemplate::new(SHORTLIST_PROMPT),
            schema: OutputSchema::candidate_dishes(),
        }
    }

    /// Replaces the shortlist prompt. It may use `{domanda}` and `{contexts}`.
    #[must_use]
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// The mapping file path.
    #[must_use]
    pub fn mapping_path(&self) -> &Path {
        &self.mapping_path
    }

    /// Renders the shortlist prompt.
    #[must_use]
    pub fn prompt(&self, question: &str, contexts: &[String]) -> String {
        let contexts = contexts.join("\n");
        self.template
            .render(&[("domanda", question), ("contexts", contexts.as_str())])
    }

    /// Asks the capability which dish names in `contexts` answer `question`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailed` if the capability fails.
    pub async fn shortlist(
        &self,
        question: &str,
        contexts: &[String],
    ) -> Result<Vec<String>, MenuflowError> {
        let prompt = self.prompt(question, contexts);
        let list: CandidateDishList =
            extract_structured(self.capability.as_ref(), &prompt, &self.schema)
                .await
                .map_err(|e| MenuflowError::extraction_failed(RESOLVER_STAGE, e))?;
        Ok(list.dishes)
    }

    /// Resolves the dishes answering `question`.
    ///
    /// # Errors
    ///
    /// Returns `MappingLoad` if the mapping cannot be read and
    /// `ExtractionFailed` if the capability fails.
    pub async fn resolve(
        &self,
        question: &str,
        contexts: &[String],
    ) -> Result<Vec<ResolvedRecipe>, MenuflowError> {
        let mapping = DishMapping::load(&self.mapping_path)?;
        let candidates = self.shortlist(question, contexts).await?;
        let resolved = resolve_candidates(&candidates, &mapping);

        tracing::info!(
            candidates = candidates.len(),
            resolved = resolved.len(),
            fallback = resolved.iter().any(ResolvedRecipe::is_no_recipe),
            "Resolved candidate dishes"
        );
        Ok(resolved)
    }
}

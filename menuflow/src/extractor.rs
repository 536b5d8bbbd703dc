//! Filter extraction: from a free-text question to a [`FilterSet`].

use crate::capability::{extract_structured, OutputSchema, PromptTemplate, TextCapability};
use crate::core::FilterSet;
use crate::errors::MenuflowError;
use std::sync::Arc;

/// Stage name used in errors and logs.
pub const EXTRACTOR_STAGE: &str = "filter_extractor";

const EXTRACTION_PROMPT: &str = "Questa è la domanda dell'utente: {query}\n\n\
Il tuo compito è estrarre ingredienti o tecniche o chef o pianeti o ristoranti citati nella domanda, se disponibili. \
Per quanto riguarda gli ingredienti o le tecniche, devi estrarre solo quelli che devono essere presenti nei piatti da trovare. \
Escludi gli ingredienti o le tecniche che non devono essere presenti nei piatti da trovare. \
Se la domanda è 'quali piatti sono a base di pizza ma senza il pomodoro?' devi estrarre solo 'pizza'. \
Se gli ingredienti o le tecniche contengono più parole, prendi solo le parole più significative. \
Esempio: se l'ingrediente è 'Sashimi di Magikarp' prendi solo 'Sashimi'.";

/// Derives inclusion criteria from a question.
pub struct FilterExtractor {
    capability: Arc<dyn TextCapability>,
    template: PromptTemplate,
    schema: OutputSchema,
}

impl std::fmt::Debug for FilterExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterExtractor")
            .field("capability", &self.capability.name())
            .finish_non_exhaustive()
    }
}

impl FilterExtractor {
    /// Creates an extractor backed by `capability`.
    #[must_use]
    pub fn new(capability: Arc<dyn TextCapability>) -> Self {
        Self {
            capability,
            template: PromptTemplate::new(EXTRACTION_PROMPT),
            schema: OutputSchema::filter_set(),
        }
    }

    /// Replaces the prompt. It may use `{query}`.
    #[must_use]
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Renders the prompt for a question.
    #[must_use]
    pub fn prompt(&self, question: &str) -> String {
        self.template.render(&[("query", question)])
    }

    /// Extracts the filter set for `question`.
    ///
    /// Entries are trimmed and blank ones dropped. No retry happens here.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionFailed` if the capability is unavailable or its
    /// answer is not a filter set.
    pub async fn extract(&self, question: &str) -> Result<FilterSet, MenuflowError> {
        let prompt = self.prompt(question);
        let filters: FilterSet = extract_structured(self.capability.as_ref(), &prompt, &self.schema)
            .await
            .map_err(|e| MenuflowError::extraction_failed(EXTRACTOR_STAGE, e))?;
        let filters = filters.normalized();

        tracing::info!(
            terms = ?filters.terms(),
            chefs = ?filters.chefs,
            planets = ?filters.planets,
            restaurants = ?filters.restaurants,
            "Extracted filters"
        );
        Ok(filters)
    }
}

//! Prompt templates with `{name}` placeholders.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_][a-z0-9_]*)\}").expect("placeholder pattern is valid"));

/// A prompt with `{name}` placeholders filled at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Creates a template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder names in order of first appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Fills the placeholders in a single pass.
    ///
    /// Substituted values are never re-scanned, so braces inside them (e.g.
    /// serialized recipes) are kept verbatim. Placeholders without a value
    /// are left as written.
    #[must_use]
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let values: HashMap<&str, &str> = values.iter().copied().collect();
        PLACEHOLDER
            .replace_all(&self.template, |caps: &Captures<'_>| {
                values
                    .get(&caps[1])
                    .map_or_else(|| caps[0].to_string(), |v| (*v).to_string())
            })
            .into_owned()
    }
}

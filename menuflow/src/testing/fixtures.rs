//! Corpus and mapping fixtures.

use std::path::Path;

use crate::core::{License, MenuDocument, Recipe};
use crate::corpus::InMemoryCorpus;

fn license(name: &str, acronym: &str, level: &str) -> License {
    License {
        name: name.to_string(),
        acronym: acronym.to_string(),
        level: level.to_string(),
    }
}

/// The documents of [`sample_corpus`], as `(identifier, document)` pairs.
#[must_use]
pub fn sample_documents() -> Vec<(&'static str, MenuDocument)> {
    vec![
        (
            "Anima Cosmica",
            MenuDocument::new("Aurora Stellaris", "Pandora")
                .with_license(license("Psionica", "P", "2"))
                .with_recipe(Recipe::new(
                    "Curry del Vuoto",
                    ["curry rosso", "riso basmati", "Polvere di Stelle"],
                    ["Bollitura Quantistica"],
                ))
                .with_recipe(Recipe::new(
                    "Pizza Nebulare",
                    ["pizza", "mozzarella lunare"],
                    ["Cottura al Forno Stellare"],
                )),
        ),
        (
            "Datapizza",
            MenuDocument::new("Gusteau", "Tatooine")
                .with_license(license("Gravitazionale", "G", "1"))
                .with_license(license("Temporale", "t", "2"))
                .with_recipe(Recipe::new(
                    "Pizza",
                    ["pizza", "pomodoro", "basilico"],
                    ["Cottura al Forno"],
                ))
                .with_recipe(Recipe::new(
                    "Risotto Galattico",
                    ["riso carnaroli", "zafferano"],
                    ["Mantecatura"],
                )),
        ),
        (
            "Sapori di Magikarp",
            MenuDocument::new("Ash Ketchum", "Kanto")
                .with_recipe(Recipe::new(
                    "Sashimi di Magikarp",
                    ["Magikarp", "salsa di soia"],
                    ["Taglio a Fette Sottili"],
                ))
                .with_recipe(Recipe::new(
                    "Ramen Stellare",
                    ["noodles", "brodo di drago"],
                    ["Bollitura"],
                )),
        ),
    ]
}

/// A small corpus of three restaurants, in identifier order.
#[must_use]
pub fn sample_corpus() -> InMemoryCorpus {
    sample_documents()
        .into_iter()
        .fold(InMemoryCorpus::new(), |corpus, (id, doc)| {
            corpus.with_document(id, doc)
        })
}

/// Dish name mapping matching [`sample_documents`].
#[must_use]
pub fn sample_mapping() -> Vec<(&'static str, i64)> {
    vec![
        ("Curry del Vuoto", 11),
        ("Pizza Nebulare", 12),
        ("Pizza", 3),
        ("Risotto Galattico", 14),
        ("Sashimi di Magikarp", 15),
        ("Ramen Stellare", 16),
    ]
}

/// Writes each document as `<dir>/<identifier>.json`.
///
/// # Errors
///
/// Returns the IO or serialization error of the first failed write.
pub fn write_json_corpus(dir: &Path, documents: &[(&str, MenuDocument)]) -> std::io::Result<()> {
    for (identifier, document) in documents {
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(dir.join(format!("{identifier}.json")), json)?;
    }
    Ok(())
}

/// Writes a dish mapping file at `path`.
///
/// # Errors
///
/// Returns the IO error if the file cannot be written.
pub fn write_mapping(path: &Path, entries: &[(&str, i64)]) -> std::io::Result<()> {
    let map: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(name, id)| ((*name).to_string(), serde_json::json!(id)))
        .collect();
    let json = serde_json::to_string_pretty(&map)?;
    std::fs::write(path, json)
}

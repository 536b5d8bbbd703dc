//! Evidence snippets emitted for matched restaurants.

use crate::core::{License, Recipe};
use std::fmt;

/// Snippet closing a restaurant block.
pub const RESTAURANT_END: &str = "</ristorante>";

/// Prefix of the snippet opening a restaurant block.
pub const RESTAURANT_START_PREFIX: &str = "<ristorante><name>\n";

/// One evidence snippet.
///
/// For every matched restaurant the scanner emits, in order: `RestaurantStart`,
/// `Chef`, `Planet`, `Licenses`, zero or more `Recipe`, `RestaurantEnd`.
#[derive(Debug, Clone, Copy)]
pub enum Evidence<'a> {
    /// Opens the block for a restaurant identifier.
    RestaurantStart(&'a str),
    /// The restaurant's chef.
    Chef(&'a str),
    /// The restaurant's planet.
    Planet(&'a str),
    /// Every license the restaurant holds.
    Licenses(&'a [License]),
    /// A recipe containing at least one filter term.
    Recipe(&'a Recipe),
    /// Closes the block.
    RestaurantEnd,
}

impl fmt::Display for Evidence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RestaurantStart(id) => write!(f, "{RESTAURANT_START_PREFIX}{id}\n</name>"),
            Self::Chef(chef) => write!(f, "<chef>\n{chef}\n</chef>"),
            Self::Planet(planet) => write!(f, "<pianeta>\n{planet}\n</pianeta>"),
            Self::Licenses(licenses) => {
                let json = serde_json::to_string(licenses).map_err(|_| fmt::Error)?;
                write!(f, "<licenze>\n{json}\n</licenze>")
            }
            Self::Recipe(recipe) => {
                let json = serde_json::to_string(recipe).map_err(|_| fmt::Error)?;
                write!(f, "<ricetta>\n{json}\n</ricetta>")
            }
            Self::RestaurantEnd => f.write_str(RESTAURANT_END),
        }
    }
}

/// Returns the identifier if `snippet` opens a restaurant block.
#[must_use]
pub fn restaurant_start_id(snippet: &str) -> Option<&str> {
    snippet
        .strip_prefix(RESTAURANT_START_PREFIX)
        .and_then(|rest| rest.strip_suffix("\n</name>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_markers_round_trip_identifier() {
        let start = Evidence::RestaurantStart("Anima Cosmica").to_string();
        assert_eq!(start, "<ristorante><name>\nAnima Cosmica\n</name>");
        assert_eq!(restaurant_start_id(&start), Some("Anima Cosmica"));
        assert_eq!(restaurant_start_id("<chef>\nX\n</chef>"), None);
        assert_eq!(Evidence::RestaurantEnd.to_string(), RESTAURANT_END);
    }

    #[test]
    fn test_recipe_marker_serializes_full_recipe() {
        let recipe = Recipe::new("Ramen Stellare", ["noodles"], ["Bollitura"]);
        let snippet = Evidence::Recipe(&recipe).to_string();

        assert!(snippet.starts_with("<ricetta>\n"));
        assert!(snippet.ends_with("\n</ricetta>"));
        assert!(snippet.contains(r#""name":"Ramen Stellare""#));
        assert!(snippet.contains(r#""techniques":["Bollitura"]"#));
    }

    #[test]
    fn test_licenses_marker() {
        let licenses = vec![License {
            name: "Psionica".to_string(),
            acronym: "P".to_string(),
            level: "3".to_string(),
        }];
        let snippet = Evidence::Licenses(&licenses).to_string();
        assert_eq!(
            snippet,
            "<licenze>\n[{\"name\":\"Psionica\",\"acronym\":\"P\",\"level\":\"3\"}]\n</licenze>"
        );
    }
}

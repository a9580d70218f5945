use serde::{Deserialize, Serialize};
use std::fmt;

/// Continent a country belongs to.
///
/// Serialized with the capitalized names used by the catalog resources
/// (`"Africa"`, `"Americas"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Africa,
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        };
        f.write_str(name)
    }
}

/// How hard a country is to find on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    High,
}

impl Difficulty {
    /// Interpret a difficulty value from the map list.
    ///
    /// Only `"high"` and `"medium"` are recognized; every other value
    /// (including blanks and typos) counts as easy.
    pub fn from_override(value: &str) -> Self {
        match value {
            "high" => Difficulty::High,
            "medium" => Difficulty::Medium,
            _ => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        };
        f.write_str(name)
    }
}

/// A country record from the catalog.
///
/// Immutable reference data; two countries are the same country when their
/// `code` matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub code: String,
    pub name: String,
    pub full_name: String,
    pub region: Region,
    pub difficulty: Difficulty,
}

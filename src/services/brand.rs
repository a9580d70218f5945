//! Typed-answer matching for the logo game.

use crate::services::resolution::normalize;
use serde::{Deserialize, Serialize};

/// Shortest typed answer accepted as a fragment of a longer brand name.
const MIN_PARTIAL_MATCH_LEN: usize = 4;

/// A brand the player has to name from its logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub correct_name: String,
    /// Lowercase spellings accepted verbatim.
    #[serde(default)]
    pub acceptable_variations: Vec<String>,
}

/// Whether `answer` names `brand`.
///
/// Checked in order: exact name (case-insensitive), a listed variation,
/// equal alphanumeric forms, then an alphanumeric fragment of at least four
/// characters inside the brand name.
pub fn is_brand_answer_correct(answer: &str, brand: &Brand) -> bool {
    let lowered = answer.trim().to_lowercase();
    if lowered.is_empty() {
        return false;
    }

    if lowered == brand.correct_name.to_lowercase() {
        return true;
    }

    if brand.acceptable_variations.iter().any(|v| *v == lowered) {
        return true;
    }

    let cleaned = normalize(&lowered);
    let cleaned_correct = normalize(&brand.correct_name);

    if cleaned == cleaned_correct {
        return true;
    }

    cleaned.len() >= MIN_PARTIAL_MATCH_LEN && cleaned_correct.contains(&cleaned)
}

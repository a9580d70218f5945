//! Click-target identification and answer checking.
//!
//! A map click arrives as the attributes of the element that was hit. The
//! country is identified with a cascade, first match wins:
//!
//! 1. a non-empty `id` is taken as the country code as-is
//! 2. the normalized `name` is compared with each country's name and full name
//! 3. each normalized `class` token is compared with each country's name and code
//!
//! Normalization lowercases and drops everything outside `[a-z0-9]`, so
//! `"United States"` and `"united-states"` both become `unitedstates`.
//!
//! The same cascade drives [`Resolver::locate`], which finds the elements to
//! highlight for a code. Any element a click resolves to a code is located for
//! that code.

use crate::catalog::Catalog;
use crate::models::{AnswerOutcome, Country, GameMode};
use crate::services::scoring;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]").expect("Invalid normalization regex"));

/// Lowercase `value` and keep only ASCII letters and digits.
pub fn normalize(value: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&value.to_lowercase(), "")
        .into_owned()
}

/// Attributes of a clicked map element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickTarget {
    pub id: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
}

impl ClickTarget {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }
}

/// Normalized forms of one catalog country.
#[derive(Debug, Clone)]
struct IndexedCountry {
    code: String,
    name: String,
    full_name: String,
    normalized_code: String,
}

/// Identifies countries from click targets against a catalog.
///
/// Normalized names are computed once at construction; lookups walk the
/// catalog in resource order so the first matching country wins.
#[derive(Debug, Clone)]
pub struct Resolver {
    index: Vec<IndexedCountry>,
}

impl Resolver {
    pub fn new(catalog: &Catalog) -> Self {
        let index = catalog
            .iter()
            .map(|country| IndexedCountry {
                code: country.code.clone(),
                name: normalize(&country.name),
                full_name: normalize(&country.full_name),
                normalized_code: normalize(&country.code),
            })
            .collect();

        Self { index }
    }

    /// Country code for a clicked element, or `None` if nothing matches.
    pub fn identify(&self, target: &ClickTarget) -> Option<String> {
        if let Some(id) = target.id.as_deref().filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }

        if let Some(code) = target.name.as_deref().and_then(|name| self.match_name(name)) {
            return Some(code);
        }

        target
            .class
            .as_deref()
            .and_then(|class| self.match_class(class))
    }

    fn match_name(&self, name: &str) -> Option<String> {
        let needle = normalize(name);
        if needle.is_empty() {
            return None;
        }

        self.index
            .iter()
            .find(|entry| entry.name == needle || entry.full_name == needle)
            .map(|entry| entry.code.clone())
    }

    fn match_class(&self, class: &str) -> Option<String> {
        let tokens: Vec<String> = class
            .split_whitespace()
            .map(normalize)
            .filter(|token| !token.is_empty())
            .collect();
        if tokens.is_empty() {
            return None;
        }

        self.index
            .iter()
            .find(|entry| {
                tokens
                    .iter()
                    .any(|token| *token == entry.name || *token == entry.normalized_code)
            })
            .map(|entry| entry.code.clone())
    }

    /// Indices of the `targets` that stand for `code`, for highlighting.
    pub fn locate(&self, code: &str, targets: &[ClickTarget]) -> Vec<usize> {
        targets
            .iter()
            .enumerate()
            .filter(|(_, target)| self.identify(target).as_deref() == Some(code))
            .map(|(index, _)| index)
            .collect()
    }
}

/// Compare a submitted code with the expected country and score it.
///
/// Codes are compared exactly; `None` (a timeout) is always wrong.
pub fn check_answer(
    submitted_code: Option<&str>,
    expected: &Country,
    time_spent_secs: f64,
    mode: GameMode,
) -> AnswerOutcome {
    let is_correct = submitted_code == Some(expected.code.as_str());
    let points_earned = if is_correct {
        scoring::score(time_spent_secs, mode)
    } else {
        0
    };

    AnswerOutcome {
        is_correct,
        points_earned,
        correct_country: expected.clone(),
    }
}

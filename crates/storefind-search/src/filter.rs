//! Grocery-likeness classification for raw search results.
//!
//! The classification is a heuristic, not a guarantee: a fixed category-tag
//! whitelist plus a case-insensitive name pattern covering generic grocery
//! terms and common chain names. False positives and negatives are expected;
//! what matters is that the same three-step policy is applied every time.

use std::sync::LazyLock;

use regex::Regex;
use storefind_places::RawPlace;

/// Category tags that mark a result as grocery-relevant on their own.
pub const TAG_WHITELIST: &[&str] = &[
    "grocery_or_supermarket",
    "convenience_store",
    "department_store",
    "store",
];

static DEFAULT_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)grocery|supermarket|market|mart|food|foods|walmart|target|kroger|safeway|aldi|costco|fresh|save on|save-on-foods",
    )
    .expect("valid regex")
});

/// Decides whether a raw result should be surfaced as a grocery-relevant
/// place. Pluggable so the whitelist/pattern can be swapped per locale
/// without touching the aggregation algorithm.
pub trait PlacePredicate {
    fn accept(&self, place: &RawPlace) -> bool;
}

/// Default grocery classifier. Policy, first match wins:
///
/// 1. Reject a result lacking a `place_id` or a coordinate.
/// 2. Accept if any category tag is in the whitelist.
/// 3. Accept if the display name matches the name pattern.
/// 4. Otherwise reject.
#[derive(Debug, Clone)]
pub struct GroceryFilter {
    whitelist: Vec<String>,
    name_pattern: Regex,
}

impl GroceryFilter {
    /// A filter with a custom whitelist and name pattern.
    #[must_use]
    pub fn new(whitelist: Vec<String>, name_pattern: Regex) -> Self {
        Self {
            whitelist,
            name_pattern,
        }
    }
}

impl Default for GroceryFilter {
    fn default() -> Self {
        Self {
            whitelist: TAG_WHITELIST.iter().map(|t| (*t).to_owned()).collect(),
            name_pattern: DEFAULT_NAME_PATTERN.clone(),
        }
    }
}

impl PlacePredicate for GroceryFilter {
    fn accept(&self, place: &RawPlace) -> bool {
        if place.place_id.is_none() || place.coordinate().is_none() {
            return false;
        }
        if place
            .types
            .iter()
            .any(|t| self.whitelist.iter().any(|w| w == t))
        {
            return true;
        }
        self.name_pattern.is_match(&place.name)
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

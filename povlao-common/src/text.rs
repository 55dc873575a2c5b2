//! Text matching helpers
//!
//! Search is accent- and case-insensitive ("Beyoncé" matches "beyonce");
//! guess checking is case-insensitive only.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase and strip diacritics so that text can be compared for search
pub fn fold(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// True when `folded_query` occurs in the folded form of `haystack`
///
/// The query must already be folded; callers fold it once per search.
pub fn contains_folded(haystack: &str, folded_query: &str) -> bool {
    fold(haystack).contains(folded_query)
}

/// Case-insensitive equality used for guess correctness and artist filters
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

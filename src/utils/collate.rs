//! Case-insensitive, accent-folding string ordering used for list and item sorting

use std::cmp::Ordering;

/// Fold a string into its comparison key
///
/// Accented letters are transliterated so "Émile" sorts next to "Emile"
/// rather than after "Z".
pub fn sort_key(s: &str) -> String {
    deunicode::deunicode(s.trim()).to_lowercase()
}

/// Compare two display strings
///
/// Primary order is the folded key; ties fall back to the lowercase original
/// and then the raw string so the ordering is total.
pub fn compare(a: &str, b: &str) -> Ordering {
    sort_key(a)
        .cmp(&sort_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

//! URL-safe slugs for celebration names.

use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug regex"));

/// Slug used when nothing usable remains.
const FALLBACK_SLUG: &str = "event";

/// Lowercases `value` and collapses every run of other characters to `-`.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let slug = NON_SLUG_REGEX.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

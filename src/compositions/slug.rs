//! Slug generation.
//!
//! A slug is `"{id}-" + normalize(title)`. The numeric id prefix is unique on
//! its own, so title collisions can never collide slugs; the unique index on
//! the column is the storage-level backstop.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w]+").unwrap());

/// Lowercase `title` and collapse every run of non-word characters into a
/// single hyphen. Leading and trailing hyphens are trimmed.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    NON_WORD
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Build the slug for a persisted composition.
#[must_use]
pub fn slug_for(id: i64, title: &str) -> String {
    format!("{id}-{}", normalize_title(title))
}

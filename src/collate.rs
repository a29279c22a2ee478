//! Locale-aware string ordering for task titles.
//!
//! Wraps the ICU root collator with default options (tertiary strength,
//! non-ignorable punctuation), the same ordering a browser's `localeCompare`
//! gives without an explicit locale.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};

/// A root-locale collator, built once and reused across comparisons.
pub struct TitleCollator {
    collator: Option<Collator>,
}

impl TitleCollator {
    pub fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(error) => {
                log::warn!("root collator unavailable, falling back to code point order: {error}");
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off comparison; sorting code should hold a [`TitleCollator`] instead.
pub fn compare(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}

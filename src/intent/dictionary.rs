//! Intent dictionary
//!
//! Maps lowercase keywords and phrases to the categories they point at. The
//! dictionary is rebuilt from the current catalog snapshot on every request;
//! it is cheap and holds no state between requests.

use std::collections::BTreeMap;

use tracing::debug;

use super::curated::{ProblemEntry, PROBLEM_KEYWORDS};
use super::hints::{HintExtractor, LegacyDetailsHints, ResourceHints, StructuredHints};
use crate::core::types::{Catalog, Resource};

/// Keys must be longer than this many characters
pub const MIN_KEY_CHARS: usize = 3;

/// Keyword/phrase → categories mapping
///
/// Keys are kept sorted so iteration, and with it phrase matching, is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentDictionary {
    entries: BTreeMap<String, Vec<String>>,
}

/// Normalize a candidate key, rejecting ones that are too short
fn normalize_key(raw: &str) -> Option<String> {
    let key = raw.trim().to_lowercase();
    (key.chars().count() > MIN_KEY_CHARS).then_some(key)
}

impl IntentDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `key` to a single category, replacing any previous mapping
    pub fn insert(&mut self, key: &str, category: &str) -> bool {
        match normalize_key(key) {
            Some(key) => {
                self.entries.insert(key, vec![category.to_string()]);
                true
            }
            None => false,
        }
    }

    /// Map `key` to a single category only if it is not mapped yet
    pub fn insert_if_absent(&mut self, key: &str, category: &str) -> bool {
        match normalize_key(key) {
            Some(key) if !self.entries.contains_key(&key) => {
                self.entries.insert(key, vec![category.to_string()]);
                true
            }
            _ => false,
        }
    }

    /// Map `key` to several categories, replacing any previous mapping
    pub fn insert_many(&mut self, key: &str, categories: &[&str]) -> bool {
        match normalize_key(key) {
            Some(key) if !categories.is_empty() => {
                self.entries
                    .insert(key, categories.iter().map(|c| c.to_string()).collect());
                true
            }
            _ => false,
        }
    }

    /// Categories for an exact key
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Multi-word keys, in key order
    pub fn phrases(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(|(key, _)| key.contains(' '))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds an [`IntentDictionary`] from a catalog snapshot
pub struct IntentDictionaryBuilder {
    extractors: Vec<Box<dyn HintExtractor>>,
    curated: &'static [ProblemEntry],
}

impl Default for IntentDictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentDictionaryBuilder {
    /// Builder reading structured hints first, then legacy `details` callouts
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(StructuredHints), Box::new(LegacyDetailsHints)],
            curated: PROBLEM_KEYWORDS,
        }
    }

    /// Builder with a custom set of hint extractors
    pub fn with_extractors(extractors: Vec<Box<dyn HintExtractor>>) -> Self {
        Self {
            extractors,
            curated: PROBLEM_KEYWORDS,
        }
    }

    /// Replace the curated problem keyword table
    pub fn with_curated(mut self, curated: &'static [ProblemEntry]) -> Self {
        self.curated = curated;
        self
    }

    fn hints_for(&self, resource: &Resource) -> ResourceHints {
        let mut hints = ResourceHints::default();
        for extractor in &self.extractors {
            hints.extend(extractor.extract(resource));
        }
        hints
    }

    /// Build the dictionary
    ///
    /// Per resource, in catalog order:
    /// 1. aliases overwrite existing keys
    /// 2. use-case tokens only fill keys that are still free
    /// 3. name tokens overwrite
    /// 4. chips overwrite
    ///
    /// The curated problem table is merged last and always wins.
    pub fn build(&self, catalog: &Catalog) -> IntentDictionary {
        let mut dictionary = IntentDictionary::new();

        for (category, resource) in catalog.iter_resources() {
            let hints = self.hints_for(resource);

            for alias in &hints.aliases {
                dictionary.insert(alias, category);
            }

            for token in hints.use_cases.iter().flat_map(|item| use_case_tokens(item)) {
                dictionary.insert_if_absent(token, category);
            }

            let name = resource.name.to_lowercase();
            for token in name.split_whitespace() {
                dictionary.insert(token, category);
            }

            for chip in &resource.chips {
                dictionary.insert(chip, category);
            }
        }

        let mined = dictionary.len();
        for (key, categories) in self.curated {
            dictionary.insert_many(key, categories);
        }

        debug!(
            "Built intent dictionary: {} mined keys, {} total after curated merge",
            mined,
            dictionary.len()
        );

        dictionary
    }
}

/// Tokens of one use-case item: drop a trailing "ing", split on whitespace
fn use_case_tokens(item: &str) -> impl Iterator<Item = &str> {
    let item = item.trim();
    let item = item.strip_suffix("ing").unwrap_or(item);
    item.split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEY_CHARS)
}

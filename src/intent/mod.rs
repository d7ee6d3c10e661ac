//! Intent resolution for Campus Compass
//!
//! This module provides:
//! - Query preprocessing (lowercase, punctuation, stop-words)
//! - Intent dictionary mining from catalog text plus curated problem tables
//! - Structured and legacy free-text hint extraction
//! - Three-tier intent matching (phrase, token, curated problem)

pub mod preprocess;
pub mod curated;
pub mod hints;
pub mod dictionary;
pub mod matcher;


pub use preprocess::{is_stop_word, preprocess};
pub use curated::{ProblemEntry, PROBLEM_KEYWORDS, PROBLEM_PATTERNS};
pub use hints::{HintExtractor, LegacyDetailsHints, ResourceHints, StructuredHints};
pub use dictionary::{IntentDictionary, IntentDictionaryBuilder};
pub use matcher::{flatten_categories, IntentHit, IntentMatcher, MatchConfidence, MatchTier};

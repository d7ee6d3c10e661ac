//! Curated problem tables
//!
//! Hand-maintained mappings from everyday problems to the categories that
//! solve them. Category names follow the catalog's keys.

/// A phrase and the categories it points to
pub type ProblemEntry = (&'static str, &'static [&'static str]);

const POWER: &[&str] = &["charger", "power bank", "lockers"];
const CHARGING: &[&str] = &["charger", "power bank"];

/// Problem keywords merged into the intent dictionary
///
/// These always override mined keys. Keys stay free of stop-words so they
/// can match a preprocessed query.
pub const PROBLEM_KEYWORDS: &[ProblemEntry] = &[
    ("battery low", POWER),
    ("low battery", POWER),
    ("died", POWER),
    ("dead phone", POWER),
    ("phone dead", POWER),
    ("dying", CHARGING),
    ("recharge", CHARGING),
    ("rain", &["umbrella"]),
    ("raining", &["umbrella"]),
    ("heavy bags", &["lockers"]),
    ("store bags", &["lockers"]),
    ("print", &["printer"]),
    ("printing", &["printer"]),
    ("presentation", &["projector", "laptop"]),
    ("quiet space", &["study room"]),
    ("group project", &["study room"]),
];

/// Multi-word problem phrases tried when no dictionary key matched
///
/// Tested against both the preprocessed and the raw lowercased query, so
/// phrases may contain stop-words.
pub const PROBLEM_PATTERNS: &[ProblemEntry] = &[
    ("out of power", CHARGING),
    ("out of battery", CHARGING),
    ("no battery", CHARGING),
    ("phone is dead", POWER),
    ("need to charge", CHARGING),
    ("caught in the rain", &["umbrella"]),
    ("nowhere to put", &["lockers"]),
    ("need to print", &["printer"]),
    ("place to study", &["study room"]),
    ("somewhere to study", &["study room"]),
];

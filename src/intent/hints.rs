//! Resource hint extraction
//!
//! Aliases and use cases feed the intent dictionary. They come either from
//! the structured `aliases` / `useCases` fields or, for catalogs imported from
//! the old free-text format, from callouts inside `details`. Both sources sit
//! behind [`HintExtractor`] so the dictionary builder does not care which
//! one produced a hint.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::types::Resource;

lazy_static! {
    /// "also known as 'A' ... or 'B';" and the called/referred to as/termed variants
    ///
    /// The tail stops at the end of the clause or sentence so the next
    /// callout is matched on its own.
    static ref ALIAS_CALLOUT: Regex = Regex::new(
        r#"(?i)also\s+(?:known\s+as|called|referred\s+to\s+as|termed)\s+['"‘“]([^'"‘’“”]+)['"’”]([^;.]*)"#
    )
    .expect("alias callout pattern is valid");

    /// Trailing "or 'B'" inside an alias callout
    static ref ALIAS_ALTERNATIVE: Regex = Regex::new(
        r#"(?i)\bor\s+['"‘“]([^'"‘’“”]+)['"’”]"#
    )
    .expect("alias alternative pattern is valid");

    /// "use cases include|encompass|cover <list>;" ending at ';', '.' or end of text
    static ref USE_CASE_CLAUSE: Regex = Regex::new(
        r"(?i)use\s+cases\s+(?:include|encompass|cover)\s+([^;.]+)"
    )
    .expect("use case pattern is valid");
}

/// Hints gathered for one resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceHints {
    /// Alternate names, verbatim
    pub aliases: Vec<String>,
    /// Use-case list items, one phrase each
    pub use_cases: Vec<String>,
}

impl ResourceHints {
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.use_cases.is_empty()
    }

    /// Append another extractor's hints after this one's
    pub fn extend(&mut self, other: ResourceHints) {
        self.aliases.extend(other.aliases);
        self.use_cases.extend(other.use_cases);
    }
}

/// Source of alias and use-case hints for a resource
pub trait HintExtractor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract hints; never fails, unmatched input yields no hints
    fn extract(&self, resource: &Resource) -> ResourceHints;
}

/// Reads the structured `aliases` and `useCases` fields
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredHints;

impl HintExtractor for StructuredHints {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, resource: &Resource) -> ResourceHints {
        ResourceHints {
            aliases: resource.aliases.clone(),
            use_cases: resource.use_cases.clone(),
        }
    }
}

/// Legacy adapter that mines the free-text `details` field
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDetailsHints;

impl LegacyDetailsHints {
    /// Alternate names from "also known as 'A' ... or 'B';" callouts
    pub fn extract_aliases(details: &str) -> Vec<String> {
        let mut aliases = Vec::new();
        for caps in ALIAS_CALLOUT.captures_iter(details) {
            if let Some(first) = caps.get(1) {
                aliases.push(first.as_str().trim().to_string());
            }
            if let Some(rest) = caps.get(2) {
                if let Some(alt) = ALIAS_ALTERNATIVE.captures(rest.as_str()).and_then(|c| c.get(1)) {
                    aliases.push(alt.as_str().trim().to_string());
                }
            }
        }
        aliases
    }

    /// Comma-separated items of "use cases include ...;" clauses
    pub fn extract_use_cases(details: &str) -> Vec<String> {
        USE_CASE_CLAUSE
            .captures_iter(details)
            .filter_map(|caps| caps.get(1))
            .flat_map(|list| list.as_str().split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl HintExtractor for LegacyDetailsHints {
    fn name(&self) -> &'static str {
        "legacy-details"
    }

    fn extract(&self, resource: &Resource) -> ResourceHints {
        match resource.details.as_deref() {
            Some(details) => ResourceHints {
                aliases: Self::extract_aliases(details),
                use_cases: Self::extract_use_cases(details),
            },
            None => ResourceHints::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_callout_with_alternative() {
        let details = "A compact battery. Also known as 'portable charger' (the common name) or 'juice pack'; lasts a day.";
        assert_eq!(
            LegacyDetailsHints::extract_aliases(details),
            vec!["portable charger", "juice pack"]
        );
    }

    #[test]
    fn test_alias_callout_variants() {
        assert_eq!(
            LegacyDetailsHints::extract_aliases("It is also called \"brolly\"; keeps you dry"),
            vec!["brolly"]
        );
        assert_eq!(
            LegacyDetailsHints::extract_aliases("also referred to as 'VR camera';"),
            vec!["VR camera"]
        );
        assert_eq!(
            LegacyDetailsHints::extract_aliases("Also termed ‘study pod’ or ‘focus room’;"),
            vec!["study pod", "focus room"]
        );
    }

    #[test]
    fn test_consecutive_callouts_each_extracted() {
        assert_eq!(
            LegacyDetailsHints::extract_aliases(
                "Also known as 'power brick'. Also called 'juice box'; lasts all day."
            ),
            vec!["power brick", "juice box"]
        );
        assert_eq!(
            LegacyDetailsHints::extract_aliases(
                "Also known as 'brolly'. Sturdy, or 'canopy' if you like. Also termed 'rain shield';"
            ),
            vec!["brolly", "rain shield"]
        );
    }

    #[test]
    fn test_use_case_clause() {
        let details = "Use cases include charging phones, powering tablets, emergencies; ask staff.";
        assert_eq!(
            LegacyDetailsHints::extract_use_cases(details),
            vec!["charging phones", "powering tablets", "emergencies"]
        );

        let details = "use cases cover virtual tours, and photography.";
        assert_eq!(
            LegacyDetailsHints::extract_use_cases(details),
            vec!["virtual tours", "and photography"]
        );
    }

    #[test]
    fn test_malformed_details_yield_nothing() {
        let resource = Resource::new(1, "Thing", "misc")
            .with_details("also known as 'unterminated; use cases include");
        let hints = LegacyDetailsHints.extract(&resource);
        assert!(hints.is_empty());
    }

    #[test]
    fn test_structured_hints_read_fields() {
        let resource = Resource::new(1, "Power bank", "power bank")
            .with_aliases(["Portable battery"])
            .with_use_cases(["charging phones"]);
        let hints = StructuredHints.extract(&resource);
        assert_eq!(hints.aliases, vec!["Portable battery"]);
        assert_eq!(hints.use_cases, vec!["charging phones"]);
    }
}

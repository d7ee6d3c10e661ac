//! Catalog text extraction
//!
//! Flattens a resource into the single normalized string that seeds both its
//! embedding and intent-dictionary mining.

use crate::core::types::Resource;

/// Build the normalized text blob for a resource
///
/// Fields are concatenated in a fixed order: name, category, description,
/// extended info (details, aliases, use cases), chips, locations, duration.
/// Empty fields contribute nothing and whitespace runs collapse to one space,
/// so the output is a pure function of the input.
pub fn extract_resource_text(resource: &Resource, category: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(8 + resource.chips.len() + resource.locations.len());

    parts.push(&resource.name);
    parts.push(category);
    parts.push(&resource.description);
    if let Some(details) = resource.details.as_deref() {
        parts.push(details);
    }
    parts.extend(resource.aliases.iter().map(String::as_str));
    parts.extend(resource.use_cases.iter().map(String::as_str));
    parts.extend(resource.chips.iter().map(String::as_str));
    parts.extend(resource.locations.iter().map(String::as_str));
    if let Some(duration) = resource.duration.as_deref() {
        parts.push(duration);
    }

    normalize_whitespace(parts.into_iter())
}

/// Join fragments with single spaces, dropping empty ones
fn normalize_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

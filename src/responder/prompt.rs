//! Prompt construction and canned replies

use crate::core::types::{CandidateMatch, MatchType};

/// Reply when nothing in the catalog matched
pub const FALLBACK_MESSAGE: &str = "I couldn't find a campus resource that matches what you're looking for. \
If you know of one that should be listed, please add it through the contribute page.";

/// Reply when resolution failed
pub const ERROR_MESSAGE: &str = "Sorry, something went wrong while looking that up. Please try again in a moment.";

const PREAMBLE: &str = "You are the campus resource assistant. Answer the student's question using only \
the resources listed below. Do not mention, invent or link to anything that is not listed. \
Keep the answer short and friendly.";

fn phrasing_hint(match_type: MatchType) -> &'static str {
    match match_type {
        MatchType::Intent => {
            "These resources directly address the need described. Recommend the best fit first and say where to find it."
        }
        _ => {
            "These resources are related by meaning rather than an exact match. Suggest they might help instead of promising they will."
        }
    }
}

/// One resource as a prompt line
pub fn describe_match(position: usize, candidate: &CandidateMatch) -> String {
    let resource = &candidate.resource;
    let mut line = format!("{}. {} (category: {})", position, resource.name, candidate.category);
    if !resource.description.trim().is_empty() {
        line.push_str(&format!(" - {}", resource.description.trim()));
    }
    if !resource.locations.is_empty() {
        line.push_str(&format!(" | Locations: {}", resource.locations.join(", ")));
    }
    if let Some(url) = resource.navigate_to.url() {
        line.push_str(&format!(" | Link: {}", url));
    }
    line
}

/// Grounded prompt listing only the matched resources
pub fn build_prompt(query: &str, match_type: MatchType, matches: &[CandidateMatch]) -> String {
    let listing: Vec<String> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| describe_match(i + 1, m))
        .collect();

    format!(
        "{}\n{}\n\nQuestion: {}\n\nResources:\n{}",
        PREAMBLE,
        phrasing_hint(match_type),
        query.trim(),
        listing.join("\n")
    )
}

/// Plain listing used when no generator is available or it failed
pub fn templated_reply(matches: &[CandidateMatch]) -> String {
    let lines: Vec<String> = matches
        .iter()
        .map(|m| match m.resource.locations.first() {
            Some(location) => format!("- {} ({}), at {}", m.resource.name, m.category, location),
            None => format!("- {} ({})", m.resource.name, m.category),
        })
        .collect();
    format!("Here are some resources that may help:\n{}", lines.join("\n"))
}

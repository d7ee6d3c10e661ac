//! Query preprocessing
//!
//! Normalizes free-text queries before keyword matching: lowercase, drop
//! sentence punctuation, remove stop-words.

/// Punctuation removed before tokenizing
pub const STRIPPED_PUNCTUATION: [char; 6] = ['?', '.', ',', '!', ';', ':'];

/// Closed-class words and domain filler that never carry intent
const STOP_WORDS: &[&str] = &[
    // articles and determiners
    "a", "an", "the", "this", "that", "these", "those", "any", "some",
    // pronouns
    "i", "im", "i'm", "me", "my", "mine", "we", "us", "our", "you", "your", "it", "its",
    // wh-words
    "what", "where", "when", "which", "who", "whom", "whose", "why", "how",
    // auxiliary verbs
    "is", "are", "am", "was", "were", "be", "been", "being", "do", "does", "did",
    "can", "could", "would", "should", "will", "shall", "may", "might", "must",
    "have", "has", "had",
    // prepositions and conjunctions
    "to", "of", "for", "in", "on", "at", "by", "with", "from", "and", "or", "there", "here",
    // domain filler
    "campus", "available", "loan", "loans", "borrow", "borrowing", "university", "please",
];

/// Check whether a lowercase token is a stop-word
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Normalize a query for keyword matching
///
/// Returns an empty string when nothing but stop-words and punctuation
/// remain. Applying it twice gives the same result as applying it once.
pub fn preprocess(query: &str) -> String {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !is_stop_word(token))
        .collect::<Vec<_>>()
        .join(" ")
}

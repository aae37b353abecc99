//! Tokenization of extracted page text
//!
//! Text is split on runs of non-alphabetic characters and lower-cased. Stop-words
//! are dropped and do not consume a position slot, so positions count indexed
//! terms only.

/// Words too common to be worth indexing
pub const STOP_WORDS: &[&str] = &["the", "of", "to", "and", "a", "an", "in", "is", "it"];

/// Returns true if `word` is excluded from postings and anchor terms
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Splits text into lower-cased words, dropping empty tokens
///
/// # Examples
///
/// ```
/// use sumi_index::indexer::separate_words;
///
/// assert_eq!(separate_words("Hello, World-42x"), vec!["hello", "world", "x"]);
/// ```
pub fn separate_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Returns the indexable terms of `text` with their ordinal positions
pub fn indexable_terms(text: &str) -> Vec<(String, u32)> {
    separate_words(text)
        .into_iter()
        .filter(|word| !is_stop_word(word))
        .enumerate()
        .map(|(position, word)| (word, position as u32))
        .collect()
}

/// Returns the stop-word-filtered terms of an anchor text
pub fn anchor_terms(text: &str) -> Vec<String> {
    separate_words(text)
        .into_iter()
        .filter(|word| !is_stop_word(word))
        .collect()
}

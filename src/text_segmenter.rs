/*!
 * Word and sentence segmentation for the auxiliary translation columns.
 *
 * Words are whitespace-separated tokens reduced to their ASCII letters and
 * lowercased; sentences end at a token whose last character is one of
 * `. ? ! ; ,`.
 */

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

static NON_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-zA-Z]+").expect("letter filter is a valid regex"));

const SENTENCE_TERMINATORS: &[char] = &['.', '?', '!', ';', ','];

/// Built-in English stop words
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "as", "at", "be", "but", "by", "for", "if", "in", "is", "it", "of",
        "on", "or", "so", "the", "to", "with", "you", "your", "that", "this", "from", "not",
        "are", "have", "has", "which", "they", "their", "we", "us", "i", "me", "my", "him",
        "his", "her", "hers", "its", "our", "ours", "yours", "thou", "thee", "thy", "do", "did",
        "done", "does", "doing", "had", "hadst", "hath", "may", "might", "must", "shall",
        "should", "will", "wilt", "would",
    ]
    .into_iter()
    .collect()
});

fn clean_word(word: &str) -> String {
    NON_LETTERS.replace_all(word, "").to_lowercase()
}

/// Split text into lowercase letter-only words, dropping built-in stop words
pub fn split_into_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(clean_word)
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word.as_str()))
        .collect()
}

/// Split text into unique words in first-occurrence order, dropping the given stop words
pub fn unique_words(text: &str, stop_words: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .map(clean_word)
        .filter(|word| !word.is_empty() && !stop_words.contains(word))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// The built-in stop words as an owned set
pub fn default_stop_words() -> HashSet<String> {
    STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Load a stop-word list, one word per line
pub fn load_stop_words<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read stop words: {:?}", path.as_ref()))?;
    Ok(content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Split text into naive sentences delimited by trailing punctuation
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        current.push(word);
        if word.ends_with(SENTENCE_TERMINATORS) {
            sentences.push(current.join(" "));
            current.clear();
        }
    }

    if !current.is_empty() {
        sentences.push(current.join(" "));
    }

    sentences
}

// src/stats/tokenize.rs
// Word tokenizer for page statistics: lowercase ASCII letter runs of at least
// two characters, minus English stop-words.

use std::collections::HashSet;
use std::sync::OnceLock;

pub fn tokenize(text: &str) -> Vec<String> {
    let stop = stop_words();
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|word| word.len() >= 2)
        .map(str::to_ascii_lowercase)
        .filter(|word| !stop.contains(word.as_str()))
        .collect()
}

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| STOP_WORD_LIST.iter().copied().collect())
}

// Contractions are split by the tokenizer ("don't" -> "don", "t"), so the
// list carries the fragments that survive the length filter.
const STOP_WORD_LIST: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "couldn", "did", "didn", "do", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn",
    "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "if", "in", "into", "is", "isn", "it", "its", "itself", "let",
    "ll", "me", "more", "most", "mustn", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "re", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was", "wasn", "we",
    "were", "weren", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
    "won", "would", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

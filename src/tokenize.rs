//! # Tokenizer & Normalizer
//!
//! Parses free text into comparable token streams: lower-case, hyphen-aware
//! word runs, collapsed through a closed normalization table (plural/acronym
//! unification) and a stopword list. Mirrors the regex-driven tokenizer in
//! `relevance::tokenize`, but closed-vocabulary and domain-specific instead of
//! generic `\w+`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*").expect("tokenizer regex"));

/// Plural→singular / acronym unification. Closed enumeration; unlisted tokens
/// pass through unchanged.
fn normalize_token(tok: &str) -> String {
    match tok {
        "euas" => "eua".to_string(),
        "ukas" => "uka".to_string(),
        "ccas" => "cca".to_string(),
        "accus" => "accu".to_string(),
        "nzus" => "nzu".to_string(),
        "i-rec" => "irec".to_string(),
        "i-recs" => "irec".to_string(),
        "credits" => "credit".to_string(),
        "offsets" => "offset".to_string(),
        other => other.to_string(),
    }
}

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "to", "of", "in", "on", "for", "with", "by", "from", "at", "and", "or",
        "as", "after", "before", "amid", "over", "under", "into", "out", "up", "down", "new",
        "fresh", "year", "yr",
    ]
    .into_iter()
    .collect()
});

/// Steps 1–3 and 6 only: extract, lower-case, normalize, dedup — no stopword
/// or length filtering. Signal detection needs to see every token.
pub fn tokenize_for_signals(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in WORD_RE.find_iter(text) {
        let norm = normalize_token(&m.as_str().to_lowercase());
        if seen.insert(norm.clone()) {
            out.push(norm);
        }
    }
    out
}

/// Full tokenization contract: extract → lower-case → normalize → drop
/// stopwords → drop length-≤1 tokens → dedup, preserving first occurrence.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in WORD_RE.find_iter(text) {
        let norm = normalize_token(&m.as_str().to_lowercase());
        if STOPWORDS.contains(norm.as_str()) || norm.len() <= 1 {
            continue;
        }
        if seen.insert(norm.clone()) {
            out.push(norm);
        }
    }
    out
}

//! # Signal Extractor
//!
//! Detects closed-vocabulary market / topic / geography signals in a piece of
//! text, with phrase-level synonym expansion for markets and regex-based
//! whole-word/long-form matching for geos.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Signals;
use crate::tokenize::tokenize_for_signals;

const MARKETS: [&str; 9] = [
    "eua", "uka", "rggi", "cca", "accu", "nzu", "irec", "ccer", "corsia",
];

const SINGLE_WORD_TOPICS: [&str; 6] = ["vcm", "cdr", "dac", "beccs", "biochar", "methane"];
// "forest", "offset", "credit" are also single-word topics.
const SINGLE_WORD_TOPICS_2: [&str; 3] = ["forest", "offset", "credit"];

const MULTI_WORD_TOPICS: [&str; 3] = [
    "voluntary carbon market",
    "carbon border adjustment mechanism",
    "emissions trading system",
];

const SINGLE_WORD_COUNTRIES: [&str; 6] = ["taiwan", "malaysia", "india", "china", "australia", "alberta"];
const SINGLE_WORD_COUNTRIES_2: [&str; 3] = ["guyana", "brazil", "indonesia"];
const SINGLE_WORD_COUNTRIES_3: [&str; 1] = ["vietnam"];

static SOUTH_AFRICA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsouth africa\b").expect("south africa regex"));

// --- market synonym expansion (phrase → injected token) ---
struct MarketSynonym {
    phrase: &'static str,
    injects: &'static str,
}
static MARKET_SYNONYMS: [MarketSynonym; 7] = [
    MarketSynonym { phrase: "eu ets", injects: "eua" },
    MarketSynonym { phrase: "eu emissions trading", injects: "eua" },
    MarketSynonym { phrase: "emissions trading system", injects: "eua" },
    MarketSynonym { phrase: "uk ets", injects: "uka" },
    MarketSynonym { phrase: "regional greenhouse gas initiative", injects: "rggi" },
    MarketSynonym { phrase: "california carbon allowance", injects: "cca" },
    MarketSynonym { phrase: "california cap-and-trade", injects: "cca" },
];
// Separate table: multiple phrases injecting the same market id (accu/nzu) —
// kept apart so the const array above stays homogeneous in length at a glance.
static MARKET_SYNONYMS_2: [MarketSynonym; 3] = [
    MarketSynonym { phrase: "australian carbon credit unit", injects: "accu" },
    MarketSynonym { phrase: "safeguard mechanism", injects: "accu" },
    MarketSynonym { phrase: "new zealand ets", injects: "nzu" },
];

static US_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(us|u\.s\.|u\.s\.a\.|united states)\b").expect("us regex")
});
static UK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(uk|u\.k\.|united kingdom)\b").expect("uk regex")
});
static EU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(eu|european union)\b").expect("eu regex"));

fn market_id_to_static(s: &str) -> &'static str {
    MARKETS.iter().find(|&&m| m == s).copied().unwrap_or("")
}

fn geo_id_to_static(s: &str) -> &'static str {
    const ALL: [&str; 17] = [
        "united_states", "united_kingdom", "eu", "europe", "new_zealand", "south_korea",
        "taiwan", "malaysia", "india", "china", "australia", "alberta", "guyana", "brazil",
        "indonesia", "vietnam", "south_africa",
    ];
    ALL.iter().find(|&&g| g == s).copied().unwrap_or("")
}

fn topic_id_to_static(s: &str) -> &'static str {
    const ALL: [&str; 12] = [
        "vcm", "cdr", "dac", "beccs", "biochar", "methane", "forest", "offset", "credit",
        "voluntary carbon market", "carbon border adjustment mechanism", "emissions trading system",
    ];
    ALL.iter().find(|&&t| t == s).copied().unwrap_or("")
}

/// Extract market / topic / geography signals from raw text.
pub fn extract_signals(text: &str) -> Signals {
    let lower = text.to_lowercase();
    let mut tokens = tokenize_for_signals(text);

    for syn in MARKET_SYNONYMS.iter() {
        if lower.contains(syn.phrase) {
            tokens.push(syn.injects.to_string());
        }
    }
    for syn in MARKET_SYNONYMS_2.iter() {
        if lower.contains(syn.phrase) {
            tokens.push(syn.injects.to_string());
        }
    }

    let mut signals = Signals::default();

    for &m in MARKETS.iter() {
        if tokens.iter().any(|t| t == m) {
            signals.markets.insert(market_id_to_static(m));
        }
    }

    for &t in SINGLE_WORD_TOPICS.iter().chain(SINGLE_WORD_TOPICS_2.iter()) {
        if tokens.iter().any(|tok| tok == t) {
            signals.topics.insert(topic_id_to_static(t));
        }
    }
    for &t in MULTI_WORD_TOPICS.iter() {
        if lower.contains(t) {
            signals.topics.insert(topic_id_to_static(t));
        }
    }

    if US_RE.is_match(text) {
        signals.geos.insert(geo_id_to_static("united_states"));
    }
    if UK_RE.is_match(text) {
        signals.geos.insert(geo_id_to_static("united_kingdom"));
    }
    if EU_RE.is_match(text) {
        signals.geos.insert(geo_id_to_static("eu"));
    }
    if lower.contains("europe") {
        signals.geos.insert(geo_id_to_static("europe"));
    }
    if lower.contains("new zealand") {
        signals.geos.insert(geo_id_to_static("new_zealand"));
    }
    if lower.contains("south korea") {
        signals.geos.insert(geo_id_to_static("south_korea"));
    }
    if SOUTH_AFRICA_RE.is_match(text) {
        signals.geos.insert(geo_id_to_static("south_africa"));
    }
    for &c in SINGLE_WORD_COUNTRIES
        .iter()
        .chain(SINGLE_WORD_COUNTRIES_2.iter())
        .chain(SINGLE_WORD_COUNTRIES_3.iter())
    {
        if tokens.iter().any(|tok| tok == c) {
            signals.geos.insert(geo_id_to_static(c));
        }
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_market_by_synonym_phrase() {
        let s = extract_signals("EU ETS prices hit record high amid cold snap");
        assert!(s.markets.contains("eua"));
        assert!(s.geos.contains("eu"));
    }

    #[test]
    fn detects_market_by_exact_token() {
        let s = extract_signals("RGGI auction clears at $20");
        assert!(s.markets.contains("rggi"));
    }

    #[test]
    fn detects_specific_geo() {
        let s = extract_signals("Taiwan launches carbon fee rules");
        assert!(s.geos.contains("taiwan"));
        assert!(s.has_specific_geo());
    }

    #[test]
    fn broad_geo_alone_is_not_specific() {
        let s = extract_signals("European holidays are warmer");
        assert!(s.geos.contains("europe"));
        assert!(!s.has_specific_geo());
    }

    #[test]
    fn multi_word_topic_matches_substring() {
        let s = extract_signals("EU weighs carbon border adjustment mechanism revision");
        assert!(s.topics.contains("carbon border adjustment mechanism"));
    }

    #[test]
    fn us_uk_eu_acronyms_match_whole_word_only() {
        let s = extract_signals("Australia's accu scheme grows");
        assert!(!s.geos.contains("eu"), "must not match 'eu' inside other words");
    }

    #[test]
    fn safeguard_mechanism_injects_accu() {
        let s = extract_signals("Australia's safeguard mechanism tightens baselines");
        assert!(s.markets.contains("accu"));
    }
}

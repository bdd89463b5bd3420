//! # Query Generator
//!
//! Builds a small, prioritized, deduplicated set of search queries per
//! headline, biased toward primary and official sources.

use once_cell::sync::Lazy;
use regex::Regex;

static PROPER_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("proper noun regex"));

static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d[\d,.]*\s*(?:million|billion|trillion)?").expect("currency regex"));
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%").expect("percent regex"));
static UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:\.\d+)?\s*(?:billion|million|thousand)?\s*(?:tons?|tonnes?|credits?)")
        .expect("unit regex")
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:201|202)\d\b").expect("year regex"));
static ETS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(ets|eua|uka)\b").expect("ets regex"));

/// Build the ordered, deduplicated list of search queries for a headline.
pub fn build_search_queries(title: &str, excerpt: Option<&str>) -> Vec<String> {
    let mut queries = Vec::new();

    // 1. Quoted exact title.
    queries.push(format!("\"{}\"", title));

    // 2. Quoted first sentence of the excerpt, cut at 150 chars.
    if let Some(ex) = excerpt {
        if let Some(sentence) = first_sentence(ex, 150) {
            queries.push(format!("\"{}\"", sentence));
        }

        // 3. Proper nouns not already in the title, capped at 3.
        let title_lower = title.to_lowercase();
        let mut noun_count = 0;
        for m in PROPER_NOUN_RE.find_iter(ex) {
            if noun_count >= 3 {
                break;
            }
            let noun = m.as_str();
            let noun_lower = noun.to_lowercase();
            if noun_lower.starts_with("the ") || noun_lower.starts_with("a ") {
                continue;
            }
            if title_lower.contains(&noun_lower) {
                continue;
            }
            queries.push(format!("{} {}", title, noun));
            noun_count += 1;
        }

        // 4. Number-with-context, capped at 2.
        let mut num_count = 0;
        for m in number_matches(ex) {
            if num_count >= 2 {
                break;
            }
            if title_lower.contains(&m.to_lowercase()) {
                continue;
            }
            queries.push(format!("{} {}", title, m));
            num_count += 1;
        }
    }

    // 5. Keyword-triggered augmentations.
    let full_lower = format!("{} {}", title, excerpt.unwrap_or_default()).to_lowercase();
    if full_lower.contains("vcm") {
        queries.push(format!("{} voluntary carbon market", title));
    }
    if ETS_RE.is_match(&full_lower) {
        queries.push(format!("{} emissions trading system", title));
    }
    if full_lower.contains("corsia") {
        queries.push(format!("{} corsia", title));
    }
    if full_lower.contains("ccer") {
        queries.push(format!("{} ccer", title));
    }
    if full_lower.contains("biochar") {
        queries.push(format!("{} biochar", title));
    }

    // 6. Geography-triggered site: operators.
    if full_lower.contains("korea") || full_lower.contains("south korea") {
        queries.push(format!("{} site:go.kr", title));
    }
    if full_lower.contains("eu ") || full_lower.contains("european union") {
        queries.push(format!("{} site:europa.eu", title));
    }
    if full_lower.contains("japan") {
        queries.push(format!("{} site:go.jp", title));
    }
    if full_lower.contains(" uk") || full_lower.contains("united kingdom") {
        queries.push(format!("{} site:gov.uk", title));
    }
    if full_lower.contains("china") {
        queries.push(format!("{} site:gov.cn", title));
    }
    if full_lower.contains("australia") {
        queries.push(format!("{} site:gov.au", title));
    }

    // 7. Blanket PDF operator.
    queries.push(format!("{} filetype:pdf", title));

    // 8. Official-announcement query if any country hint present.
    const COUNTRY_HINTS: [&str; 8] = [
        "korea", "japan", "china", "australia", "taiwan", "malaysia", "india", "brazil",
    ];
    if COUNTRY_HINTS.iter().any(|c| full_lower.contains(c)) {
        queries.push(format!("{} official announcement", title));
    }

    // 9. UNFCCC / ICVCM / IEA query if carbon/climate/emissions present.
    if full_lower.contains("carbon") || full_lower.contains("climate") || full_lower.contains("emissions")
    {
        queries.push(format!(
            "{} site:unfccc.int OR site:icvcm.org OR site:iea.org",
            title
        ));
    }

    dedup_preserve_order(queries)
}

fn first_sentence(text: &str, max_chars: usize) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let truncated: String = text.chars().take(max_chars).collect();
    let cut = truncated
        .find(['.', '!', '?'])
        .map(|i| i + 1)
        .or_else(|| truncated.rfind(char::is_whitespace))
        .unwrap_or(truncated.len());
    let s = truncated[..cut].trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn number_matches(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for m in CURRENCY_RE.find_iter(text) {
        out.push(m.as_str().to_string());
    }
    for m in PERCENT_RE.find_iter(text) {
        out.push(m.as_str().to_string());
    }
    for m in UNIT_RE.find_iter(text) {
        out.push(m.as_str().to_string());
    }
    for m in YEAR_RE.find_iter(text) {
        out.push(m.as_str().to_string());
    }
    out
}

fn dedup_preserve_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|q| seen.insert(q.clone())).collect()
}

//! # Scorer & Filter
//!
//! Computes a composite IDF-weighted similarity score between a headline and
//! a candidate article, applying hard gate filters before any score is
//! considered.

use chrono::{DateTime, Utc};

use crate::idf::IdfMap;
use crate::model::{FreeArticle, Headline, Signals};
use crate::signals::extract_signals;
use crate::tokenize::tokenize;

/// A successfully scored candidate, or the reason it was rejected.
#[derive(Debug, Clone)]
pub enum ScoreOutcome {
    Accepted { score: f32, reason: String },
    Rejected,
}

/// Tunable thresholds passed from the orchestrator / CLI.
#[derive(Debug, Clone, Copy)]
pub struct ScoreParams {
    pub now: DateTime<Utc>,
    pub days_back: i64,
    pub strict_market: bool,
    pub min_score: f32,
}

/// IDF-weighted recall of headline tokens found in the candidate:
/// `Σ_{t∈H∩C} idf(t) / Σ_{t∈H} idf(t)`, clamped to `[0,1]`.
pub fn idf_recall(h_tok: &[String], c_tok: &[String], idf: &IdfMap) -> (f32, usize) {
    let c_set: std::collections::HashSet<&str> = c_tok.iter().map(String::as_str).collect();
    let mut num = 0.0f32;
    let mut denom = 0.0f32;
    let mut shared = 0usize;
    for t in h_tok {
        let w = idf.get(t);
        denom += w;
        if c_set.contains(t.as_str()) {
            num += w;
            shared += 1;
        }
    }
    let recall = if denom > 0.0 { (num / denom).clamp(0.0, 1.0) } else { 0.0 };
    (recall, shared)
}

/// IDF-weighted Jaccard similarity: `Σ_{t∈H∩C} idf(t) / Σ_{t∈H∪C} idf(t)`,
/// clamped to `[0,1]`.
pub fn idf_jaccard(h_tok: &[String], c_tok: &[String], idf: &IdfMap) -> f32 {
    let h_set: std::collections::HashSet<&str> = h_tok.iter().map(String::as_str).collect();
    let c_set: std::collections::HashSet<&str> = c_tok.iter().map(String::as_str).collect();
    let union: std::collections::HashSet<&str> = h_set.union(&c_set).copied().collect();
    if union.is_empty() {
        return 0.0;
    }
    let mut inter = 0.0f32;
    let mut uni = 0.0f32;
    for t in union {
        let w = idf.get(t);
        uni += w;
        if h_set.contains(t) && c_set.contains(t) {
            inter += w;
        }
    }
    if uni > 0.0 {
        (inter / uni).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn signal_match_ratio(h_sig: &std::collections::BTreeSet<&'static str>, c_sig: &std::collections::BTreeSet<&'static str>) -> f32 {
    if h_sig.is_empty() {
        return 0.0;
    }
    let hits = h_sig.intersection(c_sig).count();
    hits as f32 / h_sig.len() as f32
}

/// `exp(-ageDays/14)` clamped to `[0,1]`; `0` if unparseable, forced to `0` if
/// `daysBack > 0` and the article is older than that cutoff.
fn recency(published_at: Option<&str>, now: DateTime<Utc>, days_back: i64) -> f32 {
    let Some(ts) = published_at else { return 0.0 };
    let Ok(dt) = DateTime::parse_from_rfc3339(ts) else {
        return 0.0;
    };
    let age_days = (now - dt.with_timezone(&Utc)).num_seconds() as f32 / 86400.0;
    let age_days = age_days.max(0.0);
    if days_back > 0 && age_days > days_back as f32 {
        return 0.0;
    }
    (-age_days / 14.0).exp().clamp(0.0, 1.0)
}

/// Additive quality bonus favoring primary and official sources, by
/// first-match ordering on the URL's host and path (both lowercased).
pub fn source_quality_boost(url: &str) -> f32 {
    let lower = url.to_lowercase();
    let (host, path) = split_host_path(&lower);

    if path.ends_with(".pdf") {
        return 0.18;
    }
    if host.ends_with(".gov")
        || host.ends_with(".gov.uk")
        || host.ends_with(".gouv.fr")
        || host.ends_with(".go.jp")
    {
        return 0.18;
    }
    if host.contains("sec.gov") || host.contains("epa.gov") || host.contains("energy.gov")
        || host.contains("ec.europa.eu")
    {
        return 0.18;
    }
    if host.contains("europa.eu") {
        return 0.16;
    }
    if path.contains("/investor") || path.contains("/investors") || path.contains("/ir")
        || host.contains("investor")
    {
        return 0.12;
    }
    const PRIMARY_HOSTS: [&str; 6] = [
        "carbonmarketwatch.org",
        "forest-trends.org",
        "ecosystemmarketplace.com",
        "icvcm.org",
        "unfccc.int",
        "iea.org",
    ];
    if PRIMARY_HOSTS.iter().any(|h| host.ends_with(h)) {
        return 0.12;
    }
    const WIRE_HOSTS: [&str; 3] = ["prnewswire.com", "businesswire.com", "globenewswire.com"];
    if WIRE_HOSTS.iter().any(|h| host.ends_with(h)) {
        return 0.08;
    }
    0.0
}

fn split_host_path(lower_url: &str) -> (&str, &str) {
    let without_scheme = lower_url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    match without_scheme.split_once('/') {
        Some((host, rest)) => (host, rest),
        None => (without_scheme, ""),
    }
}

/// Score `candidate` against `headline`. Applies the four hard filters in
/// order before computing the composite score; returns `Rejected` if any
/// filter fires or the final score falls below `min_score`.
pub fn score(
    headline: &Headline,
    candidate: &FreeArticle,
    idf: &IdfMap,
    params: &ScoreParams,
) -> ScoreOutcome {
    let h_tok = tokenize(&headline.title);
    let c_tok = tokenize(&candidate.title);
    let hs: Signals = extract_signals(&headline.title);
    let cs: Signals = extract_signals(&candidate.title);

    let (overlap, shared_tokens) = idf_recall(&h_tok, &c_tok, idf);
    let title_sim = idf_jaccard(&h_tok, &c_tok, idf);

    let market_match = signal_match_ratio(&hs.markets, &cs.markets);
    let topic_match = signal_match_ratio(&hs.topics, &cs.topics);
    let geo_match = signal_match_ratio(&hs.geos, &cs.geos);

    let rec = recency(candidate.published_at.as_deref(), params.now, params.days_back);
    let q_boost = source_quality_boost(&candidate.url);

    // Hard filters, in order.
    if params.strict_market && !hs.markets.is_empty() && market_match == 0.0 {
        return ScoreOutcome::Rejected;
    }
    if hs.has_specific_geo() && geo_match == 0.0 {
        return ScoreOutcome::Rejected;
    }
    if market_match == 0.0 && topic_match == 0.0 && geo_match > 0.0 && overlap < 0.50 && title_sim < 0.84 {
        return ScoreOutcome::Rejected;
    }
    if shared_tokens < 2 && title_sim < 0.90 {
        return ScoreOutcome::Rejected;
    }

    let final_score = 0.56 * overlap
        + 0.28 * title_sim
        + 0.06 * market_match
        + 0.04 * topic_match
        + 0.02 * geo_match
        + 0.04 * rec
        + q_boost;

    if final_score < params.min_score {
        return ScoreOutcome::Rejected;
    }

    let reason = format!(
        "overlap={:.2} titleSim={:.2} recency={:.2} market={:.2} topic={:.2} geo={:.2} quality={:.2} sharedTokens={}",
        overlap, title_sim, rec, market_match, topic_match, geo_match, q_boost, shared_tokens
    );

    ScoreOutcome::Accepted { score: final_score, reason }
}

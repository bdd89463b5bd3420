//! Pipeline orchestrator.
//!
//! Sequences collection → per-headline search → IDF build → score/filter →
//! top-K selection → emission.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::idf::build_idf;
use crate::model::{FreeArticle, Headline, RelatedFree};
use crate::query::build_search_queries;
use crate::scoring::{score, ScoreOutcome, ScoreParams};
use crate::search::{extract_candidates, SearchClient};
use crate::tokenize::tokenize;

#[derive(Debug, Clone, Copy)]
pub struct PipelineParams {
    pub queries_per_headline: usize,
    pub search_per_headline: usize,
    pub results_per_query: usize,
    pub per_headline_candidate_cap: usize,
    pub top_k: usize,
    pub min_score: f32,
    pub strict_market: bool,
    pub days_back: i64,
}

/// Runs the per-headline search phase for one headline: up to
/// `search_per_headline` queries are fanned out as spawned tasks and joined,
/// then their candidates are merged into a URL-keyed map capped at
/// `per_headline_candidate_cap`. Returns the merged candidate list and the
/// count of search queries that failed (logged by the caller, not fatal).
async fn search_headline(
    headline: &Headline,
    client: &Arc<dyn SearchClient>,
    params: &PipelineParams,
) -> (Vec<FreeArticle>, usize) {
    let mut queries = build_search_queries(&headline.title, headline.excerpt.as_deref());
    queries.truncate(params.queries_per_headline);
    queries.truncate(params.search_per_headline);

    let results_per_query = params.results_per_query;
    let handles: Vec<_> = queries
        .into_iter()
        .map(|query| {
            let client = Arc::clone(client);
            crate::metrics::incr_search_queries(1);
            tokio::spawn(async move {
                let outcome = client.search(&query, results_per_query).await;
                (query, outcome)
            })
        })
        .collect();

    let mut merged: BTreeMap<String, FreeArticle> = BTreeMap::new();
    let mut failures = 0usize;

    for handle in handles {
        if merged.len() >= params.per_headline_candidate_cap {
            break;
        }
        let (query, outcome) = match handle.await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "search task panicked");
                crate::metrics::incr_search_failures();
                failures += 1;
                continue;
            }
        };
        match outcome {
            Ok(resp) => {
                let candidates = extract_candidates(&resp, params.results_per_query);
                crate::metrics::incr_candidates_extracted(candidates.len() as u64);
                for c in candidates {
                    if merged.len() >= params.per_headline_candidate_cap
                        && !merged.contains_key(&c.url)
                    {
                        continue;
                    }
                    merged.entry(c.url.clone()).or_insert(c);
                }
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "search query failed");
                crate::metrics::incr_search_failures();
                failures += 1;
            }
        }
    }

    (merged.into_values().collect(), failures)
}

/// Run the full pipeline: collect is the caller's responsibility (headlines
/// are passed in already-ordered), so this covers search, IDF build, and
/// score/filter/top-K selection. Returns the scored headlines alongside the
/// raw, pre-filter candidate pool (deduped by URL across all headlines), so
/// callers can persist it with `-saveFree`.
pub async fn run(
    headlines: Vec<Headline>,
    client: &Arc<dyn SearchClient>,
    params: &PipelineParams,
    now: DateTime<Utc>,
) -> (Vec<Headline>, Vec<FreeArticle>) {
    let mut per_headline_candidates = Vec::with_capacity(headlines.len());
    for h in &headlines {
        let (candidates, _failures) = search_headline(h, client, params).await;
        per_headline_candidates.push(candidates);
    }

    // Global dedupe pool, first-seen-wins across headlines, preserving
    // collector order.
    let mut global_pool: BTreeMap<String, FreeArticle> = BTreeMap::new();
    for candidates in &per_headline_candidates {
        for c in candidates {
            global_pool.entry(c.url.clone()).or_insert_with(|| c.clone());
        }
    }

    let mut corpus: Vec<Vec<String>> = headlines.iter().map(|h| tokenize(&h.title)).collect();
    corpus.extend(global_pool.values().map(|c| tokenize(&c.title)));
    let idf = build_idf(corpus.iter().map(|d| d.iter().map(String::as_str)));

    let score_params = ScoreParams {
        now,
        days_back: params.days_back,
        strict_market: params.strict_market,
        min_score: params.min_score,
    };

    let mut out = Vec::with_capacity(headlines.len());
    for (mut headline, candidates) in headlines.into_iter().zip(per_headline_candidates) {
        let mut related: Vec<RelatedFree> = Vec::new();
        let mut by_url = std::collections::HashSet::new();
        for candidate in candidates {
            if !by_url.insert(candidate.url.clone()) {
                continue;
            }
            match score(&headline, &candidate, &idf, &score_params) {
                ScoreOutcome::Accepted { score, reason } => {
                    related.push(RelatedFree::from_candidate(candidate, score, reason));
                }
                ScoreOutcome::Rejected => {
                    crate::metrics::incr_candidates_filtered(1);
                }
            }
        }

        related.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.title.cmp(&b.title))
        });
        related.truncate(params.top_k);
        crate::metrics::incr_related_free_emitted(related.len() as u64);

        headline.related_free = related;
        out.push(headline);
    }

    (out, global_pool.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{NullSearchClient, RawSearchResponse, StructuredResult};
    use async_trait::async_trait;

    fn params() -> PipelineParams {
        PipelineParams {
            queries_per_headline: 4,
            search_per_headline: 4,
            results_per_query: 5,
            per_headline_candidate_cap: 20,
            top_k: 2,
            min_score: 0.0,
            strict_market: false,
            days_back: 0,
        }
    }

    struct StubClient;
    #[async_trait]
    impl SearchClient for StubClient {
        async fn search(&self, query: &str, _cap: usize) -> anyhow::Result<RawSearchResponse> {
            Ok(RawSearchResponse {
                structured: vec![StructuredResult {
                    title: Some(query.trim_matches('"').to_string()),
                    url: format!("https://example.com/{}", query.len()),
                    snippet: None,
                }],
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn queries_per_headline_disables_search_when_zero() {
        let headlines = vec![Headline::new("reuters", "EU ETS prices hit record high", "https://paywall/a")];
        let mut p = params();
        p.queries_per_headline = 0;
        let client: Arc<dyn SearchClient> = Arc::new(NullSearchClient);
        let (out, pool) = run(headlines, &client, &p, Utc::now()).await;
        assert!(out[0].related_free.is_empty());
        assert!(pool.is_empty());
    }

    #[tokio::test]
    async fn top_k_truncates_and_preserves_headline_order() {
        let headlines = vec![
            Headline::new("reuters", "First headline here", "https://paywall/a"),
            Headline::new("carbon-brief", "Second headline here", "https://paywall/b"),
        ];
        let client: Arc<dyn SearchClient> = Arc::new(StubClient);
        let (out, pool) = run(headlines, &client, &params(), Utc::now()).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source, "reuters");
        assert_eq!(out[1].source, "carbon-brief");
        assert!(!pool.is_empty(), "raw candidate pool must carry the search results over");
    }
}

//! End-to-end scenario tests exercising `pipeline::run` against a stub
//! search client, covering top-K selection / tie-break and URL dedupe.

use std::sync::Arc;

use async_trait::async_trait;
use carbon_relay::model::Headline;
use carbon_relay::pipeline::{self, PipelineParams};
use carbon_relay::search::{RawSearchResponse, SearchClient, StructuredResult};

struct FixedResultsClient {
    results: Vec<StructuredResult>,
}

#[async_trait]
impl SearchClient for FixedResultsClient {
    async fn search(&self, _query: &str, _cap: usize) -> anyhow::Result<RawSearchResponse> {
        Ok(RawSearchResponse {
            structured: self.results.clone(),
            ..Default::default()
        })
    }
}

fn structured(title: &str, url: &str) -> StructuredResult {
    StructuredResult {
        title: Some(title.to_string()),
        url: url.to_string(),
        snippet: None,
    }
}

fn params(top_k: usize) -> PipelineParams {
    PipelineParams {
        queries_per_headline: 1,
        search_per_headline: 1,
        results_per_query: 10,
        per_headline_candidate_cap: 10,
        top_k,
        min_score: 0.0,
        strict_market: false,
        days_back: 0,
    }
}

/// S6 — top-K and tie-break: of four candidates, the exact-title match
/// ranks first; among two candidates with identical (tied) titles, the
/// alphabetically earlier title wins the tie.
#[tokio::test]
async fn s6_top_k_and_tie_break() {
    let headline = Headline::new(
        "carbon-brief",
        "Carbon price reaches new record high",
        "https://paywalled.example/story",
    );

    let client = FixedResultsClient {
        results: vec![
            structured("Carbon price reaches new record high", "https://news.example/b"),
            structured("Unrelated shipping delays persist", "https://news.example/d"),
            structured("Carbon price climbs to a new record", "https://news.example/a"),
            structured("Carbon price climbs to a new record", "https://news.example/c"),
        ],
    };

    let client: Arc<dyn SearchClient> = Arc::new(client);
    let (out, _pool) = pipeline::run(vec![headline], &client, &params(2), chrono::Utc::now()).await;
    let related = &out[0].related_free;

    assert_eq!(related.len(), 2, "top_k=2 must truncate the survivors");
    assert_eq!(related[0].url, "https://news.example/b", "exact title match ranks first");
    assert_eq!(
        related[1].url, "https://news.example/a",
        "among tied scores, ties break on ascending title — /a and /c share an identical title, so insertion order decides which URL survives the tie"
    );
    assert!(related[0].score >= related[1].score);
}

/// URL dedupe invariant: no two relatedFree entries for the same headline
/// share a URL, even when the same URL is returned by multiple queries.
#[tokio::test]
async fn url_dedupe_across_queries() {
    let headline = Headline::new(
        "reuters",
        "EU ETS prices hit record high amid cold snap",
        "https://paywalled.example/story",
    );

    let client = FixedResultsClient {
        results: vec![
            structured("EU ETS prices hit record high", "https://news.example/eu-ets"),
            structured("EU ETS prices hit record high", "https://news.example/eu-ets"),
        ],
    };

    let mut p = params(5);
    p.queries_per_headline = 2;
    p.search_per_headline = 2;

    let client: Arc<dyn SearchClient> = Arc::new(client);
    let (out, _pool) = pipeline::run(vec![headline], &client, &p, chrono::Utc::now()).await;
    assert_eq!(out[0].related_free.len(), 1);
}

/// Collector ordering is preserved in the emitted output regardless of how
/// individual headlines score.
#[tokio::test]
async fn headline_order_is_preserved() {
    let headlines = vec![
        Headline::new("reuters", "First story about carbon markets", "https://paywalled.example/1"),
        Headline::new("carbon-brief", "Second story about carbon markets", "https://paywalled.example/2"),
        Headline::new("qci", "Third story about carbon markets", "https://paywalled.example/3"),
    ];

    let client = FixedResultsClient { results: vec![] };
    let client: Arc<dyn SearchClient> = Arc::new(client);
    let (out, _pool) = pipeline::run(headlines, &client, &params(3), chrono::Utc::now()).await;

    assert_eq!(out[0].source, "reuters");
    assert_eq!(out[1].source, "carbon-brief");
    assert_eq!(out[2].source, "qci");
}

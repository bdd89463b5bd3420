//! # carbon-relay — Binary Entrypoint
//!
//! Batch pipeline: collect headlines → generate search queries → recover
//! candidate articles → score & filter → emit `relatedFree` via the
//! configured sinks.
//!
//! ## CLI
//! See `config::Cli` for the full flag surface (`--sources`, `--top-k`,
//! `--min-score`, `--strict-market`, `--out`, `--headlines`, ...).

use carbon_relay::collect::{CollectorRegistry, HttpConfig, JsonFileCollector, RssCollector, SourceCollector};
use carbon_relay::config::{load_source_registry, Cli};
use carbon_relay::pipeline::{self, PipelineParams};
use carbon_relay::search::{NullSearchClient, OpenAiSearchClient, SearchClient};
use carbon_relay::sink::{JsonSink, OutputSink, SinkMux};

use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    if let Err(e) = run().await {
        eprintln!("carbon-relay: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    carbon_relay::metrics::ensure_described();

    let http = HttpConfig::default();

    let headlines = if let Some(path) = &cli.headlines {
        let collector = JsonFileCollector::new(path, "headlines-file");
        collector.collect(cli.per_source, &http).await?
    } else {
        let mut registry = CollectorRegistry::new();
        if let Some(sources_config) = &cli.sources_config {
            let file = load_source_registry(sources_config)?;
            for entry in file.source {
                let slug: &'static str = Box::leak(entry.slug.clone().into_boxed_str());
                let label: &'static str = Box::leak(entry.label.into_boxed_str());
                registry.register(Box::new(RssCollector::new(entry.feed_url, label, slug)));
            }
        }
        registry.collect_all(&cli.sources, cli.per_source, &http).await?
    };

    let params = PipelineParams {
        queries_per_headline: cli.queries_per_headline,
        search_per_headline: cli.search_per_headline,
        results_per_query: cli.results_per_query,
        per_headline_candidate_cap: cli.results_per_query * cli.queries_per_headline.max(1),
        top_k: cli.top_k,
        min_score: cli.min_score,
        strict_market: cli.strict_market,
        days_back: cli.days_back,
    };

    let search_client: Arc<dyn SearchClient> = match OpenAiSearchClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(_) => Arc::new(NullSearchClient),
    };
    let (scored, free_pool) = pipeline::run(headlines, &search_client, &params, chrono::Utc::now()).await;

    if let Some(path) = &cli.save_free {
        let body = serde_json::to_string_pretty(&free_pool).expect("FreeArticle serializes infallibly");
        std::fs::write(path, body).map_err(|source| carbon_relay::error::SinkError::JsonWrite {
            path: path.display().to_string(),
            source,
        })?;
    }

    let mut sinks: Vec<Box<dyn OutputSink>> = Vec::new();
    if cli.out == "-" {
        sinks.push(Box::new(JsonSink::stdout()));
    } else {
        sinks.push(Box::new(JsonSink::file(&cli.out)));
    }
    if let Some(notion) = carbon_relay::sink::NotionSink::from_env() {
        sinks.push(Box::new(notion));
    }
    if let Ok(email) = carbon_relay::sink::EmailSink::from_env() {
        sinks.push(Box::new(email));
    }

    let mux = SinkMux::new(sinks);
    mux.emit_all(&scored).await;

    Ok(())
}

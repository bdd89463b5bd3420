//! Pipeline configuration: CLI flags layered over environment variables,
//! expressed as a `clap` derive struct plus a small TOML layer for
//! source-registry definitions.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::error::ConfigError;

/// CLI flags the core reads, per the external-interfaces contract.
#[derive(Debug, Parser)]
#[command(name = "carbon-relay", about = "Carbon-market news-relay pipeline")]
pub struct Cli {
    /// Comma-separated source collector slugs to run.
    #[arg(long = "sources", value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Max headlines to pull per source.
    #[arg(long = "per-source", default_value_t = 20)]
    pub per_source: usize,

    /// Max search queries generated per headline.
    #[arg(long = "queries-per-headline", default_value_t = 4)]
    pub queries_per_headline: usize,

    /// Max concurrent searches issued per headline.
    #[arg(long = "search-per-headline", default_value_t = 4)]
    pub search_per_headline: usize,

    /// Max candidate results kept per query.
    #[arg(long = "results-per-query", default_value_t = 5)]
    pub results_per_query: usize,

    /// Reject candidates older than this many days (0 = no cutoff).
    #[arg(long = "days-back", default_value_t = 0)]
    pub days_back: i64,

    /// Keep at most this many relatedFree entries per headline.
    #[arg(long = "top-k", default_value_t = 3)]
    pub top_k: usize,

    /// Minimum composite score required to keep a candidate.
    #[arg(long = "min-score", default_value_t = 0.35)]
    pub min_score: f32,

    /// Reject candidates with no market overlap when the headline has a market signal.
    #[arg(long = "strict-market", default_value_t = false)]
    pub strict_market: bool,

    /// Output destination: "-" for stdout, otherwise a file path.
    #[arg(long = "out", default_value = "-")]
    pub out: String,

    /// Also write the raw candidate pool alongside the scored output.
    #[arg(long = "save-free")]
    pub save_free: Option<PathBuf>,

    /// Read headlines from a local JSON file instead of live collectors.
    #[arg(long = "headlines")]
    pub headlines: Option<PathBuf>,

    /// Path to the source-registry TOML (collector slug → feed URL).
    #[arg(long = "sources-config")]
    pub sources_config: Option<PathBuf>,
}

/// One entry in the source registry file: a slug mapped to an RSS feed URL
/// and the label attached to headlines it produces.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub slug: String,
    pub feed_url: String,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SourceRegistryFile {
    #[serde(default)]
    pub source: Vec<SourceEntry>,
}

pub fn load_source_registry(path: &std::path::Path) -> Result<SourceRegistryFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

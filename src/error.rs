//! Typed errors at the crate's I/O boundaries. Orchestration glue in
//! [`crate::pipeline`] converts these to `anyhow::Error` with `?`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("reading headline file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing headlines from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("parsing feed {url}: {source}")]
    FeedParse {
        url: String,
        #[source]
        source: quick_xml::de::DeError,
    },
    #[error("no collector registered for source slug {0:?}")]
    UnknownSource(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request for {query:?} failed: {source}")]
    Request {
        query: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("writing JSON output to {path}: {source}")]
    JsonWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Notion API request failed: {0}")]
    Notion(String),
    #[error("sending email: {0}")]
    Email(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config TOML from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

//! # Source Collectors
//!
//! Pluggable input sources that each produce a batch of [`Headline`]s. A
//! [`CollectorRegistry`] maps CLI/config source slugs to collector
//! implementations, mirroring how the original ingest pipeline mapped
//! provider names to `SourceProvider` implementations.

pub mod json_file;
pub mod rss;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::CollectError;
use crate::model::Headline;

pub use json_file::JsonFileCollector;
pub use rss::RssCollector;

/// Shared HTTP client configuration for network-backed collectors.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: "carbon-relay/0.1".to_string(),
        }
    }
}

/// A pluggable headline source.
#[async_trait]
pub trait SourceCollector: Send + Sync {
    /// Fetch up to `limit` headlines.
    async fn collect(&self, limit: usize, http: &HttpConfig) -> Result<Vec<Headline>, CollectError>;

    fn slug(&self) -> &'static str;
}

/// Slug → collector lookup used by the orchestrator to resolve `-sources`.
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: HashMap<String, Box<dyn SourceCollector>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collector: Box<dyn SourceCollector>) {
        self.collectors.insert(collector.slug().to_string(), collector);
    }

    pub fn get(&self, slug: &str) -> Option<&dyn SourceCollector> {
        self.collectors.get(slug).map(|b| b.as_ref())
    }

    /// Collect from every requested slug, in order, concatenating results.
    /// An unknown slug is a hard error: a typo in `-sources` should fail
    /// loudly rather than silently collecting less than requested.
    pub async fn collect_all(
        &self,
        slugs: &[String],
        per_source: usize,
        http: &HttpConfig,
    ) -> Result<Vec<Headline>, CollectError> {
        let mut out = Vec::new();
        for slug in slugs {
            let collector = self
                .get(slug)
                .ok_or_else(|| CollectError::UnknownSource(slug.clone()))?;
            let mut batch = collector.collect(per_source, http).await?;
            out.append(&mut batch);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCollector(&'static str, usize);

    #[async_trait]
    impl SourceCollector for StubCollector {
        async fn collect(&self, limit: usize, _http: &HttpConfig) -> Result<Vec<Headline>, CollectError> {
            Ok((0..self.1.min(limit))
                .map(|i| Headline::new(self.0, format!("Headline {i}"), format!("https://{}/{i}", self.0)))
                .collect())
        }

        fn slug(&self) -> &'static str {
            self.0
        }
    }

    #[tokio::test]
    async fn collects_in_requested_order() {
        let mut reg = CollectorRegistry::new();
        reg.register(Box::new(StubCollector("a", 5)));
        reg.register(Box::new(StubCollector("b", 5)));

        let out = reg
            .collect_all(&["b".to_string(), "a".to_string()], 2, &HttpConfig::default())
            .await
            .unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].source, "b");
        assert_eq!(out[2].source, "a");
    }

    #[tokio::test]
    async fn unknown_slug_is_an_error() {
        let reg = CollectorRegistry::new();
        let err = reg
            .collect_all(&["missing".to_string()], 5, &HttpConfig::default())
            .await;
        assert!(err.is_err());
    }
}

//! Reads headlines from a local JSON file — the fixture-friendly collector
//! used in tests and for offline/"headlines-only" runs (`-headlines`).

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::CollectError;
use crate::model::Headline;

use super::{HttpConfig, SourceCollector};

pub struct JsonFileCollector {
    path: PathBuf,
    slug: &'static str,
}

impl JsonFileCollector {
    pub fn new(path: impl Into<PathBuf>, slug: &'static str) -> Self {
        Self {
            path: path.into(),
            slug,
        }
    }
}

#[async_trait]
impl SourceCollector for JsonFileCollector {
    async fn collect(&self, limit: usize, _http: &HttpConfig) -> Result<Vec<Headline>, CollectError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| CollectError::Read {
                path: self.path.display().to_string(),
                source,
            })?;
        let mut headlines: Vec<Headline> =
            serde_json::from_str(&content).map_err(|source| CollectError::Parse {
                path: self.path.display().to_string(),
                source,
            })?;
        headlines.truncate(limit);
        Ok(headlines)
    }

    fn slug(&self) -> &'static str {
        self.slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_and_truncates_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headlines.json");
        std::fs::write(
            &path,
            r#"[
                {"source":"reuters","title":"EU ETS prices hit record high","url":"https://example.com/a","isHeadline":true},
                {"source":"reuters","title":"Second headline","url":"https://example.com/b","isHeadline":true}
            ]"#,
        )
        .unwrap();

        let collector = JsonFileCollector::new(&path, "reuters");
        let out = collector.collect(1, &HttpConfig::default()).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "EU ETS prices hit record high");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let collector = JsonFileCollector::new("/nonexistent/path.json", "x");
        assert!(collector.collect(5, &HttpConfig::default()).await.is_err());
    }
}

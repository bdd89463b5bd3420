//! Writes the headline batch as the JSON array described in the output
//! schema — either to stdout or to a file, depending on configuration.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::SinkError;
use crate::model::Headline;

use super::OutputSink;

pub enum JsonDestination {
    Stdout,
    File(PathBuf),
}

pub struct JsonSink {
    destination: JsonDestination,
}

impl JsonSink {
    pub fn stdout() -> Self {
        Self {
            destination: JsonDestination::Stdout,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            destination: JsonDestination::File(path.into()),
        }
    }
}

#[async_trait]
impl OutputSink for JsonSink {
    async fn emit(&self, headlines: &[Headline]) -> Result<(), SinkError> {
        let body = serde_json::to_string_pretty(headlines).expect("Headline serializes infallibly");
        match &self.destination {
            JsonDestination::Stdout => {
                println!("{body}");
                Ok(())
            }
            JsonDestination::File(path) => {
                std::fs::write(path, body).map_err(|source| SinkError::JsonWrite {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Headline;

    #[tokio::test]
    async fn writes_pretty_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let sink = JsonSink::file(&path);
        let headlines = vec![Headline::new("reuters", "A headline", "https://example.com/a")];
        sink.emit(&headlines).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Headline> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, headlines);
    }
}

//! # Output Sinks
//!
//! Pluggable destinations for the scored headline batch: a trait per
//! destination plus a fan-out multiplexer that emits to all of them.

pub mod email;
pub mod json;
pub mod notion;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::model::Headline;

pub use email::EmailSink;
pub use json::JsonSink;
pub use notion::NotionSink;

#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn emit(&self, headlines: &[Headline]) -> Result<(), SinkError>;

    fn name(&self) -> &'static str;
}

/// Fan-out multiplexer: runs every configured sink and logs (rather than
/// aborts on) individual failures, so one broken sink never drops the run.
pub struct SinkMux {
    sinks: Vec<Box<dyn OutputSink>>,
}

impl SinkMux {
    pub fn new(sinks: Vec<Box<dyn OutputSink>>) -> Self {
        Self { sinks }
    }

    pub async fn emit_all(&self, headlines: &[Headline]) {
        for sink in &self.sinks {
            if let Err(e) = sink.emit(headlines).await {
                tracing::warn!(sink = sink.name(), error = %e, "sink failed");
            }
        }
    }
}

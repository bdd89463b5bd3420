//! Writes headlines (and their related-free candidates) into a Notion
//! database, chunking rich text to the API's 2000-char block limit. A single
//! record's failure is logged and the run continues with the next.

use async_trait::async_trait;
use serde_json::json;

use crate::error::SinkError;
use crate::model::Headline;

use super::OutputSink;

const RICH_TEXT_CHUNK: usize = 2000;

pub struct NotionSink {
    token: String,
    database_id: String,
    client: reqwest::Client,
}

impl NotionSink {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            database_id: database_id.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let token = std::env::var("NOTION_TOKEN").ok()?;
        let database_id = std::env::var("NOTION_DATABASE_ID").ok()?;
        Some(Self::new(token, database_id))
    }

    async fn write_record(
        &self,
        title: &str,
        url: &str,
        source: &str,
        kind: &str,
        score: Option<f32>,
        published_at: Option<&str>,
    ) -> Result<(), SinkError> {
        let payload = page_payload(&self.database_id, title, url, source, kind, score, published_at);

        let resp = self
            .client
            .post("https://api.notion.com/v1/pages")
            .bearer_auth(&self.token)
            .header("Notion-Version", "2022-06-28")
            .json(&payload)
            .send()
            .await
            .map_err(|e| SinkError::Notion(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SinkError::Notion(format!(
                "Notion API returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Builds the Notion page-create payload: a `properties` object per the
/// database schema plus a `children` array of paragraph blocks holding the
/// same content chunked to the API's 2000-char rich-text limit.
fn page_payload(
    database_id: &str,
    title: &str,
    url: &str,
    source: &str,
    kind: &str,
    score: Option<f32>,
    published_at: Option<&str>,
) -> serde_json::Value {
    let body_chunks = chunk_rich_text(title, RICH_TEXT_CHUNK);
    let mut properties = json!({
        "Title": { "title": [{ "text": { "content": title } }] },
        "URL": { "url": url },
        "Source": { "select": { "name": source } },
        "Type": { "select": { "name": kind } },
        "AI Summary": {
            "rich_text": body_chunks.iter().map(|c| json!({ "text": { "content": c } })).collect::<Vec<_>>()
        },
    });
    if let Some(s) = score {
        properties["Score"] = json!({ "number": s });
    }
    if let Some(d) = published_at {
        properties["Published Date"] = json!({ "date": { "start": d } });
    }

    let children: Vec<_> = body_chunks
        .iter()
        .map(|chunk| {
            json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [{ "text": { "content": chunk } }]
                }
            })
        })
        .collect();

    json!({
        "parent": { "database_id": database_id },
        "properties": properties,
        "children": children,
    })
}

#[async_trait]
impl OutputSink for NotionSink {
    async fn emit(&self, headlines: &[Headline]) -> Result<(), SinkError> {
        for h in headlines {
            if let Err(e) = self
                .write_record(&h.title, &h.url, &h.source, "Headline", None, h.published_at.as_deref())
                .await
            {
                tracing::warn!(url = %h.url, error = %e, "Notion write failed for headline");
            }
            for rel in &h.related_free {
                if let Err(e) = self
                    .write_record(
                        &rel.title,
                        &rel.url,
                        &rel.source,
                        "Related Free",
                        Some(rel.score),
                        rel.published_at.as_deref(),
                    )
                    .await
                {
                    tracing::warn!(url = %rel.url, error = %e, "Notion write failed for related-free record");
                }
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "notion"
    }
}

fn chunk_rich_text(text: &str, chunk_len: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    text.chars()
        .collect::<Vec<_>>()
        .chunks(chunk_len)
        .map(|c| c.iter().collect())
        .collect()
}

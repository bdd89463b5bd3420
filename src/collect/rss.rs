//! Generic RSS 2.0 headline collector, parameterized over any feed URL plus
//! a source label, rather than one type per feed.

use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::CollectError;
use crate::model::Headline;

use super::{HttpConfig, SourceCollector};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

pub struct RssCollector {
    feed_url: String,
    source_label: &'static str,
    slug: &'static str,
}

impl RssCollector {
    pub fn new(feed_url: impl Into<String>, source_label: &'static str, slug: &'static str) -> Self {
        Self {
            feed_url: feed_url.into(),
            source_label,
            slug,
        }
    }

    fn parse(&self, body: &str) -> Result<Vec<Headline>, CollectError> {
        let rss: Rss = from_str(body).map_err(|source| CollectError::FeedParse {
            url: self.feed_url.clone(),
            source,
        })?;
        Ok(rss
            .channel
            .item
            .into_iter()
            .filter_map(|it| {
                let title = decode_entities(&it.title?);
                let link = it.link?;
                let mut h = Headline::new(self.source_label, title, link);
                h.published_at = it.pub_date.as_deref().and_then(parse_rfc2822_to_rfc3339);
                h.excerpt = it.description.as_deref().map(decode_entities);
                Some(h)
            })
            .collect())
    }
}

#[async_trait]
impl SourceCollector for RssCollector {
    async fn collect(&self, limit: usize, http: &HttpConfig) -> Result<Vec<Headline>, CollectError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(|source| CollectError::Fetch {
                url: self.feed_url.clone(),
                source,
            })?;
        let body = client
            .get(&self.feed_url)
            .send()
            .await
            .map_err(|source| CollectError::Fetch {
                url: self.feed_url.clone(),
                source,
            })?
            .text()
            .await
            .map_err(|source| CollectError::Fetch {
                url: self.feed_url.clone(),
                source,
            })?;
        let mut headlines = self.parse(&body)?;
        headlines.truncate(limit);
        Ok(headlines)
    }

    fn slug(&self) -> &'static str {
        self.slug
    }
}

fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).to_string()
}

fn parse_rfc2822_to_rfc3339(ts: &str) -> Option<String> {
    time::OffsetDateTime::parse(ts, &time::format_description::well_known::Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(time::UtcOffset::UTC))
        .and_then(|dt| dt.format(&time::format_description::well_known::Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<?xml version="1.0"?>
    <rss><channel>
      <item>
        <title>EU ETS prices hit record high</title>
        <link>https://example.com/eu-ets</link>
        <pubDate>Mon, 01 Sep 2025 12:34:56 GMT</pubDate>
        <description>Prices jumped amid cold snap.</description>
      </item>
      <item>
        <title>Second story</title>
        <link>https://example.com/second</link>
      </item>
    </channel></rss>"#;

    #[test]
    fn parses_items_and_converts_pubdate() {
        let c = RssCollector::new("https://feed.example/rss", "reuters", "reuters");
        let out = c.parse(FIXTURE).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "EU ETS prices hit record high");
        assert_eq!(out[0].published_at.as_deref(), Some("2025-09-01T12:34:56Z"));
        assert!(out[1].published_at.is_none());
    }

    #[test]
    fn decodes_html_entities_in_title_and_description() {
        let c = RssCollector::new("https://feed.example/rss", "reuters", "reuters");
        let out = c
            .parse(
                r#"<rss><channel><item>
                    <title>Carbon &amp; credits hit record high</title>
                    <link>https://example.com/a</link>
                    <description>Prices &gt; expectations &amp; rising.</description>
                </item></channel></rss>"#,
            )
            .unwrap();
        assert_eq!(out[0].title, "Carbon & credits hit record high");
        assert_eq!(out[0].excerpt.as_deref(), Some("Prices > expectations & rising."));
    }

    #[test]
    fn skips_items_missing_title_or_link() {
        let c = RssCollector::new("https://feed.example/rss", "reuters", "reuters");
        let out = c
            .parse(r#"<rss><channel><item><title>No link here</title></item></channel></rss>"#)
            .unwrap();
        assert!(out.is_empty());
    }
}

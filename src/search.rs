//! # Search-Result Extractor
//!
//! Recovers a deduplicated, stably-ordered list of candidate `FreeArticle`s
//! from a free-form search-backend response, using a three-tier recovery
//! discipline: structured results, then a bare "sources" list, then free-text
//! URL scraping. Each tier is consulted only if earlier tiers produced
//! nothing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::FreeArticle;

/// One structured `(title, url, snippet)` triple, when the backend supplies it.
#[derive(Debug, Clone, Default)]
pub struct StructuredResult {
    pub title: Option<String>,
    pub url: String,
    pub snippet: Option<String>,
}

/// A free-form response from a web-search backend, modeling the three tiers a
/// model-backed search can return without committing to a structured schema.
#[derive(Debug, Clone, Default)]
pub struct RawSearchResponse {
    pub structured: Vec<StructuredResult>,
    pub sources: Vec<String>,
    pub text: String,
    pub citation_urls: Vec<String>,
}

/// External search backend. Implementations must honor the three-tier
/// recovery discipline downstream in [`extract_candidates`] so scoring always
/// sees a non-empty title.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, results_cap: usize) -> anyhow::Result<RawSearchResponse>;
}

/// A backend that never finds anything — useful for `-queriesPerHeadline=0`
/// runs and as a safe default when no live search credentials are configured.
pub struct NullSearchClient;

#[async_trait]
impl SearchClient for NullSearchClient {
    async fn search(&self, _query: &str, _results_cap: usize) -> anyhow::Result<RawSearchResponse> {
        Ok(RawSearchResponse::default())
    }
}

/// Web-search backend against an OpenAI-compatible responses API, using its
/// hosted `web_search` tool. Documents the request/response wire shape this
/// pipeline expects a search backend to expose; callers supply the API key
/// via `OPENAI_API_KEY` through [`OpenAiSearchClient::from_env`].
pub struct OpenAiSearchClient {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiSearchClient {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;
        Ok(Self {
            api_key,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl SearchClient for OpenAiSearchClient {
    async fn search(&self, query: &str, results_cap: usize) -> anyhow::Result<RawSearchResponse> {
        #[derive(serde::Serialize)]
        struct ToolSpec<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
        }

        #[derive(serde::Serialize)]
        struct RequestBody<'a> {
            model: &'a str,
            input: &'a str,
            tools: Vec<ToolSpec<'a>>,
        }

        #[derive(serde::Deserialize)]
        struct Citation {
            url: String,
            title: Option<String>,
        }

        #[derive(serde::Deserialize, Default)]
        struct ResponseBody {
            #[serde(default)]
            output_text: String,
            #[serde(default)]
            citations: Vec<Citation>,
        }

        let body = RequestBody {
            model: "gpt-4o-mini",
            input: query,
            tools: vec![ToolSpec { kind: "web_search" }],
        };

        let to_search_error = |source: reqwest::Error| crate::error::SearchError::Request {
            query: query.to_string(),
            source,
        };

        let resp = self
            .client
            .post("https://api.openai.com/v1/responses")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(to_search_error)?
            .error_for_status()
            .map_err(to_search_error)?
            .json::<ResponseBody>()
            .await
            .unwrap_or_default();

        let structured = resp
            .citations
            .into_iter()
            .take(results_cap)
            .map(|c| StructuredResult {
                title: c.title,
                url: c.url,
                snippet: None,
            })
            .collect();

        Ok(RawSearchResponse {
            structured,
            text: resp.output_text,
            ..Default::default()
        })
    }
}

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s)]+").expect("url regex"));

/// Tier 1 → 2 → 3 recovery, deduped by URL, sorted by URL, truncated to cap.
pub fn extract_candidates(resp: &RawSearchResponse, cap: usize) -> Vec<FreeArticle> {
    let mut by_url: BTreeMap<String, FreeArticle> = BTreeMap::new();

    if !resp.structured.is_empty() {
        for r in &resp.structured {
            if r.url.is_empty() {
                continue;
            }
            let title = r
                .title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| synthesize_title(&r.url));
            by_url.entry(r.url.clone()).or_insert(FreeArticle {
                source: "search".to_string(),
                title,
                url: r.url.clone(),
                published_at: None,
                excerpt: r.snippet.clone(),
            });
        }
    } else if !resp.sources.is_empty() {
        for url in &resp.sources {
            if url.is_empty() {
                continue;
            }
            by_url.entry(url.clone()).or_insert(FreeArticle {
                source: "search".to_string(),
                title: synthesize_title(url),
                url: url.clone(),
                published_at: None,
                excerpt: None,
            });
        }
    } else {
        for m in URL_RE.find_iter(&resp.text) {
            let url = trim_trailing_punctuation(m.as_str());
            if url.is_empty() {
                continue;
            }
            by_url.entry(url.to_string()).or_insert(FreeArticle {
                source: "search".to_string(),
                title: synthesize_title(url),
                url: url.to_string(),
                published_at: None,
                excerpt: None,
            });
        }
        for url in &resp.citation_urls {
            if url.is_empty() {
                continue;
            }
            by_url.entry(url.clone()).or_insert(FreeArticle {
                source: "search".to_string(),
                title: synthesize_title(url),
                url: url.clone(),
                published_at: None,
                excerpt: None,
            });
        }
    }

    by_url.into_values().take(cap).collect()
}

fn trim_trailing_punctuation(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}

/// Synthesize a weak but non-empty title from a URL: strip `www.`, use the
/// first host label as the base, append path segments that aren't purely
/// numeric and are at least 3 chars long, turn hyphens/underscores into
/// spaces, and capitalize each word.
pub fn synthesize_title(url: &str) -> String {
    let without_scheme = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let (host_and_path, _) = without_scheme
        .split_once(['?', '#'])
        .unwrap_or((without_scheme, ""));
    let mut parts = host_and_path.splitn(2, '/');
    let host = parts.next().unwrap_or_default();
    let path = parts.next().unwrap_or_default();

    let host = host.strip_prefix("www.").unwrap_or(host);
    let base = host.split('.').next().unwrap_or(host);

    let mut words: Vec<String> = vec![base.to_string()];
    for seg in path.split('/') {
        if seg.is_empty() {
            continue;
        }
        if seg.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if seg.len() < 3 {
            continue;
        }
        words.push(seg.to_string());
    }

    words
        .into_iter()
        .map(|w| w.replace(['-', '_'], " "))
        .map(capitalize_words)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_words(s: String) -> String {
    s.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_tier_preferred_when_present() {
        let resp = RawSearchResponse {
            structured: vec![StructuredResult {
                title: Some("Real Title".into()),
                url: "https://example.com/a".into(),
                snippet: None,
            }],
            sources: vec!["https://example.com/b".into()],
            text: "https://example.com/c".into(),
            citation_urls: vec![],
        };
        let out = extract_candidates(&resp, 10);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Real Title");
    }

    #[test]
    fn sources_tier_used_when_no_structured() {
        let resp = RawSearchResponse {
            structured: vec![],
            sources: vec!["https://gov.uk/uk-ets-q4-report.pdf".into()],
            text: String::new(),
            citation_urls: vec![],
        };
        let out = extract_candidates(&resp, 10);
        assert_eq!(out.len(), 1);
        assert!(!out[0].title.is_empty());
    }

    #[test]
    fn text_tier_scans_free_text_and_trims_punctuation() {
        let resp = RawSearchResponse {
            structured: vec![],
            sources: vec![],
            text: "See https://example.com/news/carbon-prices-rise. Also (https://example.org/x).".into(),
            citation_urls: vec![],
        };
        let out = extract_candidates(&resp, 10);
        let urls: Vec<_> = out.iter().map(|a| a.url.as_str()).collect();
        assert!(urls.contains(&"https://example.com/news/carbon-prices-rise"));
        assert!(urls.contains(&"https://example.org/x"));
    }

    #[test]
    fn dedupes_by_url_and_sorts_stably() {
        let resp = RawSearchResponse {
            structured: vec![
                StructuredResult { title: None, url: "https://b.com/1".into(), snippet: None },
                StructuredResult { title: None, url: "https://a.com/1".into(), snippet: None },
                StructuredResult { title: None, url: "https://a.com/1".into(), snippet: None },
            ],
            ..Default::default()
        };
        let out = extract_candidates(&resp, 10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].url, "https://a.com/1");
    }

    #[test]
    fn synthesizes_title_from_url() {
        let t = synthesize_title("https://www.gov.uk/uk-ets-q4-report.pdf");
        assert_eq!(t, "Gov Uk Ets Q4 Report.pdf");
    }

    #[test]
    fn truncates_to_cap() {
        let resp = RawSearchResponse {
            sources: vec![
                "https://a.com/1".into(),
                "https://b.com/1".into(),
                "https://c.com/1".into(),
            ],
            ..Default::default()
        };
        let out = extract_candidates(&resp, 2);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn openai_client_requires_api_key() {
        std::env::remove_var("OPENAI_API_KEY");
        assert!(OpenAiSearchClient::from_env().is_err());
        std::env::set_var("OPENAI_API_KEY", "sk-test");
        assert!(OpenAiSearchClient::from_env().is_ok());
        std::env::remove_var("OPENAI_API_KEY");
    }
}

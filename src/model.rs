//! Core data model: headlines, free-article candidates, and the scored
//! `RelatedFree` records attached to each headline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A paywalled headline ingested from a source collector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Headline {
    pub source: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(rename = "isHeadline")]
    pub is_headline: bool,
    #[serde(rename = "relatedFree", default, skip_serializing_if = "Vec::is_empty")]
    pub related_free: Vec<RelatedFree>,
}

impl Headline {
    pub fn new(source: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            published_at: None,
            excerpt: None,
            is_headline: true,
            related_free: Vec::new(),
        }
    }
}

/// A free-article candidate discovered by web search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeArticle {
    pub source: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// A scored, filtered candidate attached to a headline's `relatedFree` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedFree {
    pub source: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "publishedAt", skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub score: f32,
    pub reason: String,
}

impl RelatedFree {
    pub fn from_candidate(c: FreeArticle, score: f32, reason: String) -> Self {
        Self {
            source: c.source,
            title: c.title,
            url: c.url,
            published_at: c.published_at,
            excerpt: c.excerpt,
            score,
            reason,
        }
    }
}

/// Market / topic / geography signals detected in a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    pub markets: BTreeSet<&'static str>,
    pub topics: BTreeSet<&'static str>,
    pub geos: BTreeSet<&'static str>,
}

/// The four geos considered too broad to carry a match on their own.
const BROAD_GEOS: [&str; 4] = ["eu", "europe", "united_states", "united_kingdom"];

impl Signals {
    /// True iff `geos` contains any geo other than the broad four.
    pub fn has_specific_geo(&self) -> bool {
        self.geos.iter().any(|g| !BROAD_GEOS.contains(g))
    }
}

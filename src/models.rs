//! Data models for fetched articles and their persisted representation.
//!
//! - [`ArticleRecord`]: one article as scraped, later enriched with a summary
//! - [`PersistedRecord`]: the subset of fields written to the JSONL store

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Title used when no title locator matched.
pub const TITLE_NOT_FOUND: &str = "not found";
/// Author used when no author locator matched.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// An article fetched from the site.
///
/// Created by the fetcher on a successful response. The extractor fills in
/// the text fields and the summarizer sets [`summary`](Self::summary) right
/// before the record is persisted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The requested identifier, as a string.
    pub id: String,
    /// Canonical page URL derived from `id`.
    pub url: String,
    pub title: String,
    pub author: String,
    /// Body blocks joined by a blank line. Empty when the page had no body.
    pub content: String,
    /// Publish time as displayed on the page, or empty.
    pub publish_time: String,
    /// Local time of the successful fetch, ISO-8601 with microseconds.
    pub fetch_time: String,
    /// Set only once the record has been summarized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ArticleRecord {
    /// Start a record for `id` at `url`, stamped with the current local time.
    ///
    /// Text fields start at their sentinel defaults.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: TITLE_NOT_FOUND.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            content: String::new(),
            publish_time: String::new(),
            fetch_time: now_iso(),
            summary: None,
        }
    }
}

/// One line of the JSONL store. Field order here is the key order on disk.
#[derive(Debug, Serialize)]
pub struct PersistedRecord<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub summary: &'a str,
    pub url: &'a str,
    pub publish_time: &'a str,
    pub fetch_time: &'a str,
}

impl<'a> PersistedRecord<'a> {
    /// Project a summarized record. Returns `None` if no summary is set yet.
    pub fn from_article(article: &'a ArticleRecord) -> Option<Self> {
        let summary = article.summary.as_deref()?;
        Some(Self {
            id: &article.id,
            title: &article.title,
            author: &article.author,
            summary,
            url: &article.url,
            publish_time: &article.publish_time,
            fetch_time: &article.fetch_time,
        })
    }
}

/// Current local time in the `YYYY-MM-DDTHH:MM:SS.ffffff` form.
pub fn now_iso() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

//! JSON output for batch runs.
//!
//! Unlike the JSONL store, a batch report is written once at the end of the
//! run as a single pretty-printed array of full records, body text included.

use crate::models::ArticleRecord;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `articles` to `path` as a pretty-printed JSON array.
///
/// Non-ASCII text is written as-is.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[ArticleRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;
    fs::write(path, json).await?;
    info!("Wrote JSON results");
    Ok(())
}

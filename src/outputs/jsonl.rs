//! Append-only JSON Lines store for walk results.
//!
//! Every call to [`JsonlSink::append`] opens the file, writes one complete
//! line, syncs it and closes the file again. There is no await point in
//! between, so a task cancelled by Ctrl+C stops either before or after a
//! record, never inside one.

use crate::models::{ArticleRecord, PersistedRecord};
use std::error::Error;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Line-delimited JSON file that only ever grows.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `article` as one line and sync it to disk.
    ///
    /// The article must already carry a summary.
    pub fn append(&self, article: &ArticleRecord) -> Result<(), Box<dyn Error>> {
        let record = PersistedRecord::from_article(article)
            .ok_or("article reached the JSONL sink without a summary")?;
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;

        debug!(path = %self.path.display(), id = %article.id, bytes = line.len(), "Appended record");
        Ok(())
    }
}

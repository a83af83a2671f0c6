//! Markdown report for batch runs.
//!
//! ```text
//! # sspai article digest
//!
//! Generated: 2025-05-06 20:30:00
//!
//! Articles: 2
//!
//! ---
//!
//! ## Title
//!
//! **Author**: ...
//! ...
//! ```

use crate::models::ArticleRecord;
use chrono::Local;
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Render `articles` as a Markdown document stamped with `generated_at`.
pub fn articles_to_markdown(articles: &[ArticleRecord], generated_at: &str) -> String {
    let mut md = String::new();

    writeln!(md, "# sspai article digest\n").unwrap();
    writeln!(md, "Generated: {generated_at}\n").unwrap();
    writeln!(md, "Articles: {}\n", articles.len()).unwrap();
    writeln!(md, "---\n").unwrap();

    for article in articles {
        writeln!(md, "## {}\n", article.title).unwrap();
        writeln!(md, "**Author**: {}  ", article.author).unwrap();
        writeln!(md, "**Link**: {}  ", article.url).unwrap();
        writeln!(md, "**Fetched**: {}  \n", article.fetch_time).unwrap();
        writeln!(
            md,
            "**Summary**:\n\n{}\n",
            article.summary.as_deref().unwrap_or_default()
        )
        .unwrap();
        writeln!(md, "---\n").unwrap();
    }

    md
}

/// Write the Markdown report for `articles` to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_report(articles: &[ArticleRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let md = articles_to_markdown(articles, &generated_at);
    fs::write(path, md).await?;
    info!("Wrote Markdown report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, title: &str) -> ArticleRecord {
        let mut article = ArticleRecord::new(id, format!("https://sspai.com/post/{id}"));
        article.title = title.to_string();
        article.author = "Writer".to_string();
        article.summary = Some(format!("Summary of {title}."));
        article
    }

    #[test]
    fn test_report_layout() {
        let articles = vec![article("1", "First"), article("2", "Second")];
        let md = articles_to_markdown(&articles, "2025-05-06 20:30:00");

        assert!(md.starts_with("# sspai article digest\n\nGenerated: 2025-05-06 20:30:00\n\nArticles: 2\n\n---\n\n"));
        assert!(md.contains("## First\n\n**Author**: Writer  \n**Link**: https://sspai.com/post/1  \n"));
        assert!(md.contains("**Summary**:\n\nSummary of Second.\n\n---\n\n"));
        assert_eq!(md.matches("---").count(), 3);
        assert!(md.find("## First").unwrap() < md.find("## Second").unwrap());
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let md = articles_to_markdown(&[], "now");
        assert!(md.contains("Articles: 0"));
        assert!(!md.contains("## "));
    }

    #[tokio::test]
    async fn test_write_report() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("articles.md");
        write_report(&[article("1", "First")], &path).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("## First"));
    }
}

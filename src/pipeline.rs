//! The fetch → summarize → persist pipeline.
//!
//! Everything runs strictly one identifier at a time. A failed identifier
//! is logged and skipped; it never stops a walk. The only error a walk
//! returns is a failure to write the output file.

use crate::api::AskAsync;
use crate::models::ArticleRecord;
use crate::outputs::jsonl::JsonlSink;
use crate::report::Reporter;
use crate::scrapers::sspai::FetchArticle;
use crate::summarizer::Summarizer;
use std::error::Error;
use std::fmt;
use std::ops::Range;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

/// Counters for one range walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Size of the requested range.
    pub total: u64,
    /// Identifiers tried so far.
    pub attempted: u64,
    /// Identifiers that produced a persisted record.
    pub succeeded: u64,
}

impl fmt::Display for WalkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.total)
    }
}

/// Fetcher and summarizer wired together.
#[derive(Debug)]
pub struct Pipeline<F, A> {
    fetcher: F,
    summarizer: Summarizer<A>,
    summary_length: usize,
}

impl<F, A> Pipeline<F, A>
where
    F: FetchArticle,
    A: AskAsync<Response = String>,
{
    pub fn new(fetcher: F, summarizer: Summarizer<A>, summary_length: usize) -> Self {
        Self {
            fetcher,
            summarizer,
            summary_length,
        }
    }

    /// Fetch and summarize one article.
    ///
    /// Returns `None` when the page could not be fetched; the cause is logged.
    #[instrument(level = "info", skip(self))]
    pub async fn process_article(&self, id: &str) -> Option<ArticleRecord> {
        let mut article = match self.fetcher.fetch(id).await {
            Ok(article) => article,
            Err(e) => {
                error!(%id, error = %e, "Article fetch failed");
                return None;
            }
        };

        let outcome = self.summarizer.summarize(&article, self.summary_length).await;
        debug!(
            generated = outcome.is_generated(),
            chars = outcome.text().chars().count(),
            "Summary ready"
        );
        article.summary = Some(outcome.into_text());
        Some(article)
    }

    /// Process `ids` in order, pausing `delay` between consecutive items.
    ///
    /// Returns the articles that succeeded, in input order.
    #[instrument(level = "info", skip_all, fields(count = ids.len()))]
    pub async fn process_many(&self, ids: &[String], delay: Duration) -> Vec<ArticleRecord> {
        let mut results = Vec::with_capacity(ids.len());

        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                sleep(delay).await;
            }
            info!(index = i + 1, total = ids.len(), %id, "Processing article");
            if let Some(article) = self.process_article(id).await {
                results.push(article);
            }
        }

        info!(succeeded = results.len(), total = ids.len(), "Batch complete");
        results
    }

    /// Walk `range` (end excluded), appending each success to `sink` before
    /// moving to the next identifier.
    ///
    /// `delay` is slept before every identifier, including the first.
    #[instrument(level = "info", skip(self, sink, reporter), fields(output = %sink.path().display()))]
    pub async fn walk_range<R: Reporter>(
        &self,
        range: Range<u64>,
        sink: &JsonlSink,
        delay: Duration,
        reporter: &R,
    ) -> Result<WalkStats, Box<dyn Error>> {
        let mut stats = WalkStats {
            total: range.end.saturating_sub(range.start),
            ..WalkStats::default()
        };
        info!(start = range.start, end = range.end, total = stats.total, "Starting range walk");

        for id in range {
            sleep(delay).await;
            stats.attempted += 1;

            let id = id.to_string();
            match self.process_article(&id).await {
                Some(article) => {
                    stats.succeeded += 1;
                    reporter.progress(stats.succeeded, stats.total, &article);
                    sink.append(&article)?;
                }
                None => reporter.skipped(&id),
            }
        }

        reporter.finished(&stats);
        info!(
            attempted = stats.attempted,
            succeeded = stats.succeeded,
            total = stats.total,
            "Range walk complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::report::TextReporter;
    use crate::scrapers::sspai::SspaiFetcher;
    use crate::summarizer::extractive_summary;
    use mockito::Server;
    use reqwest::StatusCode;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;

    struct FailingAsk;

    impl AskAsync for FailingAsk {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Err("service unavailable".into())
        }
    }

    struct EchoAsk;

    impl AskAsync for EchoAsk {
        type Response = String;

        async fn ask(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            Ok("generated".to_string())
        }
    }

    /// Records every id it is asked for; ids in `missing` return 404,
    /// ids in `hang` never complete.
    #[derive(Default)]
    struct ScriptedFetcher {
        seen: RefCell<Vec<String>>,
        missing: HashSet<String>,
        hang: HashSet<String>,
    }

    impl ScriptedFetcher {
        fn failing(ids: &[&str]) -> Self {
            Self {
                missing: ids.iter().map(|id| id.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl FetchArticle for ScriptedFetcher {
        async fn fetch(&self, id: &str) -> Result<ArticleRecord, FetchError> {
            self.seen.borrow_mut().push(id.to_string());
            if self.hang.contains(id) {
                std::future::pending::<()>().await;
            }
            if self.missing.contains(id) {
                return Err(FetchError::Status(StatusCode::NOT_FOUND));
            }
            let mut article = ArticleRecord::new(id, format!("https://sspai.com/post/{id}"));
            article.title = format!("Post {id}");
            article.content = format!("Body of post {id}.\n\nSecond paragraph.");
            Ok(article)
        }
    }

    fn read_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_walk_visits_each_id_once_in_order() {
        let pipeline = Pipeline::new(
            ScriptedFetcher::failing(&["12", "13"]),
            Summarizer::new(EchoAsk),
            200,
        );
        let tmp = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(tmp.path().join("abstract.jsonl"));
        let reporter = TextReporter::new(Vec::new());

        let stats = pipeline
            .walk_range(10..16, &sink, Duration::ZERO, &reporter)
            .await
            .unwrap();

        assert_eq!(*pipeline.fetcher.seen.borrow(), vec!["10", "11", "12", "13", "14", "15"]);
        assert_eq!(stats, WalkStats { total: 6, attempted: 6, succeeded: 4 });

        let ids: Vec<_> = read_lines(sink.path()).iter().map(|r| r["id"].as_str().unwrap().to_string()).collect();
        assert_eq!(ids, vec!["10", "11", "14", "15"]);
    }

    #[tokio::test]
    async fn test_empty_range_does_nothing() {
        let pipeline = Pipeline::new(ScriptedFetcher::default(), Summarizer::new(EchoAsk), 200);
        let tmp = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(tmp.path().join("abstract.jsonl"));
        let reporter = TextReporter::new(Vec::new());

        let (start, end) = (8, 5);
        let stats = pipeline.walk_range(start..end, &sink, Duration::ZERO, &reporter).await.unwrap();

        assert_eq!(stats.to_string(), "0/0");
        assert!(pipeline.fetcher.seen.borrow().is_empty());
        assert!(!sink.path().exists());
        assert!(String::from_utf8(reporter.into_inner()).unwrap().contains("Done: 0/0"));
    }

    #[tokio::test]
    async fn test_cancelled_walk_keeps_completed_lines() {
        let fetcher = ScriptedFetcher {
            hang: ["4".to_string()].into_iter().collect(),
            ..ScriptedFetcher::failing(&["2"])
        };
        let pipeline = Pipeline::new(fetcher, Summarizer::new(EchoAsk), 200);
        let tmp = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(tmp.path().join("abstract.jsonl"));
        let reporter = TextReporter::new(Vec::new());

        let walk = pipeline.walk_range(1..10, &sink, Duration::ZERO, &reporter);
        let outcome = tokio::time::timeout(Duration::from_millis(200), walk).await;
        assert!(outcome.is_err(), "walk should still be waiting on id 4");

        let lines = read_lines(sink.path());
        let ids: Vec<_> = lines.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(lines.iter().all(|r| r["summary"] == "generated"));
    }

    #[tokio::test]
    async fn test_summary_service_outage_uses_fallback() {
        let pipeline = Pipeline::new(ScriptedFetcher::default(), Summarizer::new(FailingAsk), 15);
        let article = pipeline.process_article("7").await.unwrap();

        assert_eq!(
            article.summary.as_deref(),
            Some(extractive_summary(&article.content, 15).as_str())
        );
    }

    #[tokio::test]
    async fn test_process_many_keeps_successes_in_order() {
        let pipeline = Pipeline::new(ScriptedFetcher::failing(&["b"]), Summarizer::new(EchoAsk), 200);
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let results = pipeline.process_many(&ids, Duration::ZERO).await;

        let got: Vec<_> = results.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(got, vec!["a", "c"]);
        assert!(results.iter().all(|a| a.summary.as_deref() == Some("generated")));
    }

    #[tokio::test]
    async fn test_walk_against_http_site_with_missing_post() {
        let page = |title: &str| {
            format!(
                r#"<div id="article-title" class="title">{title}</div>
                   <div class="ss__user__nickname"><span>作者</span></div>
                   <div class="content wangEditor-txt"><p>Para one.</p><p>Para two.</p></div>"#
            )
        };

        let mut server = Server::new_async().await;
        let five = server
            .mock("GET", "/post/5")
            .with_status(200)
            .with_body(page("文章五"))
            .expect(1)
            .create_async()
            .await;
        let six = server
            .mock("GET", "/post/6")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let seven = server
            .mock("GET", "/post/7")
            .with_status(200)
            .with_body(page("文章七"))
            .expect(1)
            .create_async()
            .await;

        let pipeline = Pipeline::new(
            SspaiFetcher::new(&server.url()).unwrap(),
            Summarizer::new(FailingAsk),
            200,
        );
        let tmp = tempfile::tempdir().unwrap();
        let sink = JsonlSink::new(tmp.path().join("abstract.jsonl"));
        let reporter = TextReporter::new(Vec::new());

        let stats = pipeline
            .walk_range(5..8, &sink, Duration::from_millis(1), &reporter)
            .await
            .unwrap();

        five.assert_async().await;
        six.assert_async().await;
        seven.assert_async().await;

        assert_eq!(stats.to_string(), "2/3");
        let lines = read_lines(sink.path());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], "5");
        assert_eq!(lines[0]["title"], "文章五");
        assert_eq!(lines[0]["author"], "作者");
        assert_eq!(lines[0]["summary"], "Para one. Para two.");
        assert_eq!(lines[0]["url"], format!("{}/post/5", server.url()));
        assert_eq!(lines[0]["publish_time"], "");
        assert_eq!(lines[1]["id"], "7");

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains("[1/3] Title: 文章五"));
        assert!(output.contains("[2/3] Title: 文章七"));
        assert!(output.contains("Skipped article id: 6"));
        assert!(output.contains("Done: 2/3 articles processed"));
    }
}

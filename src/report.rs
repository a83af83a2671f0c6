//! Operator-facing progress output.
//!
//! Diagnostics go through `tracing`; the lines a person watches while a walk
//! runs go through a [`Reporter`] that the caller constructs and passes in.

use crate::models::ArticleRecord;
use crate::pipeline::WalkStats;
use crate::utils::take_chars;
use std::cell::RefCell;
use std::io::{self, Stdout, Write};

/// Characters of the summary shown in a progress line.
const SUMMARY_PREVIEW_CHARS: usize = 100;

/// Receives per-identifier events from the range walker.
pub trait Reporter {
    /// An article was processed; `succeeded` counts successes so far.
    fn progress(&self, succeeded: u64, total: u64, article: &ArticleRecord);
    /// No record was produced for `id`.
    fn skipped(&self, id: &str);
    /// The walk reached the end of its range.
    fn finished(&self, stats: &WalkStats);
}

/// Writes human-readable progress to any [`Write`] target.
///
/// Write errors are ignored: losing a progress line must not stop a walk.
#[derive(Debug)]
pub struct TextReporter<W> {
    out: RefCell<W>,
}

impl TextReporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out: RefCell::new(out) }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn progress(&self, succeeded: u64, total: u64, article: &ArticleRecord) {
        let summary = article.summary.as_deref().unwrap_or_default();
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "\n[{succeeded}/{total}] Title: {}", article.title);
        let _ = writeln!(out, "Author: {}", article.author);
        let _ = writeln!(out, "Summary: {}...", take_chars(summary, SUMMARY_PREVIEW_CHARS));
        let _ = out.flush();
    }

    fn skipped(&self, id: &str) {
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "Skipped article id: {id}");
        let _ = out.flush();
    }

    fn finished(&self, stats: &WalkStats) {
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "\nDone: {stats} articles processed");
        let _ = out.flush();
    }
}

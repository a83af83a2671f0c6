//! Two-tier article summaries.
//!
//! The generative tier asks the LLM for a summary. If that fails for any
//! reason the extractive tier builds one from the article's own paragraphs.
//! The extractive tier is a pure function of the content and the length
//! budget, so a summary is always available without network access.

use crate::api::AskAsync;
use crate::models::ArticleRecord;
use crate::utils::take_chars;
use tracing::{info, instrument, warn};

/// Summary budget in characters when none is configured.
pub const DEFAULT_SUMMARY_LENGTH: usize = 200;

/// Characters of article body included in the prompt.
pub const PROMPT_CONTENT_CHARS: usize = 3000;

const ELLIPSIS: &str = "...";

/// A boundary paragraph is only cut when more than this many characters of
/// budget remain; otherwise it is dropped.
const MIN_PARTIAL_BUDGET: usize = 20;

/// Which tier produced a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Generated(String),
    Extracted(String),
}

impl SummaryOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Extracted(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) | Self::Extracted(text) => text,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Summarizes articles through an [`AskAsync`] backend with a local fallback.
#[derive(Debug)]
pub struct Summarizer<A> {
    llm: A,
}

impl<A> Summarizer<A>
where
    A: AskAsync<Response = String>,
{
    pub fn new(llm: A) -> Self {
        Self { llm }
    }

    /// Summarize `article` in at most roughly `max_length` characters.
    ///
    /// Never fails: any backend error yields [`SummaryOutcome::Extracted`].
    /// A generated summary is returned as-is even if it overshoots the budget.
    #[instrument(level = "info", skip_all, fields(id = %article.id))]
    pub async fn summarize(&self, article: &ArticleRecord, max_length: usize) -> SummaryOutcome {
        let prompt = build_prompt(article, max_length);
        match self.llm.ask(&prompt).await {
            Ok(summary) => {
                info!(chars = summary.chars().count(), "Generated summary");
                SummaryOutcome::Generated(summary)
            }
            Err(e) => {
                warn!(error = %e, "Summary service failed; using extractive fallback");
                SummaryOutcome::Extracted(extractive_summary(&article.content, max_length))
            }
        }
    }
}

/// User prompt for the generative tier.
pub fn build_prompt(article: &ArticleRecord, max_length: usize) -> String {
    format!(
        "Write a concise summary of the article below, in the same language as the article. The summary should:\n\
         1. stay within {max_length} characters\n\
         2. cover the main content and the key points of the article\n\
         3. keep an objective, neutral tone\n\
         4. read fluently\n\
         \n\
         Title: {title}\n\
         Content:\n\
         {content}\n\
         \n\
         Summary:",
        title = article.title,
        content = take_chars(&article.content, PROMPT_CONTENT_CHARS),
    )
}

/// Build a summary from the leading paragraphs of `content`.
///
/// Whole paragraphs are taken while they fit in `max_length` characters. The
/// first paragraph that does not fit is cut and marked with `...` when more
/// than 20 characters of budget remain, and dropped otherwise. If nothing at
/// all was taken, the content is cut flat to `max_length - 3` characters
/// plus `...`.
pub fn extractive_summary(content: &str, max_length: usize) -> String {
    let mut summary = String::new();
    let mut used = 0usize;

    for paragraph in content.split("\n\n") {
        let len = paragraph.chars().count();
        if used + len <= max_length {
            summary.push_str(paragraph);
            summary.push(' ');
            used += len + 1;
        } else {
            let remaining = max_length.saturating_sub(used);
            if remaining > MIN_PARTIAL_BUDGET {
                summary.push_str(&take_chars(paragraph, remaining - ELLIPSIS.len()));
                summary.push_str(ELLIPSIS);
            }
            break;
        }
    }

    let summary = summary.trim();
    if summary.is_empty() {
        let mut flat = take_chars(content, max_length.saturating_sub(ELLIPSIS.len()));
        flat.push_str(ELLIPSIS);
        flat
    } else {
        summary.to_string()
    }
}

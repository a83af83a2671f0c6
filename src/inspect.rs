//! Locator discovery for saved pages.
//!
//! When the site changes its markup the extraction chains in
//! [`scrapers::selectors`](crate::scrapers::selectors) start returning
//! sentinels. Feeding a saved copy of a post through [`analyze_html`] lists
//! which generic title, content and author locators still hit, so a new
//! chain entry can be picked.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const TITLE_CANDIDATES: [&str; 4] = ["h1.title", "h1", ".article-title", "[class*=\"title\"]"];
const CONTENT_CANDIDATES: [&str; 5] = [
    "div.content",
    "article",
    ".article-content",
    "[class*=\"content\"]",
    "main",
];
const AUTHOR_CANDIDATES: [&str; 4] = ["a.author-name", ".author", "[class*=\"author\"]", "span.author"];

/// Only the best content candidates are worth printing.
const CONTENT_REPORT_LIMIT: usize = 5;
const SAMPLE_CHARS: usize = 50;

static CANDIDATE_SELECTORS: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    TITLE_CANDIDATES
        .iter()
        .chain(CONTENT_CANDIDATES.iter())
        .chain(AUTHOR_CANDIDATES.iter())
        .map(|css| (*css, Selector::parse(css).expect("static CSS selector must parse")))
        .collect()
});

/// A locator that matched at least once, with a sample of its first hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextCandidate {
    pub selector: String,
    pub count: usize,
    pub first_text: String,
}

/// A content locator that matched, sized by the text of its first hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentCandidate {
    pub selector: String,
    pub count: usize,
    pub text_length: usize,
}

/// Everything [`analyze_html`] found. Content candidates are sorted by
/// text length, longest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HtmlAnalysis {
    pub title_candidates: Vec<TextCandidate>,
    pub content_candidates: Vec<ContentCandidate>,
    pub author_candidates: Vec<TextCandidate>,
}

fn selector(css: &str) -> &'static Selector {
    CANDIDATE_SELECTORS
        .iter()
        .find(|(known, _)| *known == css)
        .map(|(_, sel)| sel)
        .expect("candidate selectors are compiled up front")
}

fn text_candidates(document: &Html, candidates: &[&str], sample_chars: Option<usize>) -> Vec<TextCandidate> {
    candidates
        .iter()
        .filter_map(|css| {
            let hits: Vec<_> = document.select(selector(css)).collect();
            let first = hits.first()?;
            let text = first.text().collect::<String>();
            let text = text.trim();
            let first_text = match sample_chars {
                Some(n) => text.chars().take(n).collect(),
                None => text.to_string(),
            };
            Some(TextCandidate { selector: css.to_string(), count: hits.len(), first_text })
        })
        .collect()
}

/// Probe `html` with the generic candidate locators.
pub fn analyze_html(html: &str) -> HtmlAnalysis {
    let document = Html::parse_document(html);

    let mut content_candidates: Vec<ContentCandidate> = CONTENT_CANDIDATES
        .iter()
        .filter_map(|css| {
            let hits: Vec<_> = document.select(selector(css)).collect();
            let first = hits.first()?;
            let text_length = first
                .text()
                .map(|piece| piece.trim().chars().count())
                .sum();
            Some(ContentCandidate { selector: css.to_string(), count: hits.len(), text_length })
        })
        .collect();
    content_candidates.sort_by(|a, b| b.text_length.cmp(&a.text_length));

    HtmlAnalysis {
        title_candidates: text_candidates(&document, &TITLE_CANDIDATES, Some(SAMPLE_CHARS)),
        content_candidates,
        author_candidates: text_candidates(&document, &AUTHOR_CANDIDATES, None),
    }
}

/// Read a saved page from disk and analyze it.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn analyze_html_file(path: &Path) -> Result<HtmlAnalysis, Box<dyn Error>> {
    let html = fs::read_to_string(path).await?;
    let analysis = analyze_html(&html);
    info!(
        titles = analysis.title_candidates.len(),
        contents = analysis.content_candidates.len(),
        authors = analysis.author_candidates.len(),
        "Analyzed HTML structure"
    );
    Ok(analysis)
}

/// Plain-text rendering of an analysis for the terminal.
pub fn render(analysis: &HtmlAnalysis) -> String {
    let mut out = String::new();
    writeln!(out, "=== HTML structure ===\n").unwrap();

    writeln!(out, "Title candidates:").unwrap();
    for c in &analysis.title_candidates {
        writeln!(out, "  {}: {} found, sample: {}", c.selector, c.count, c.first_text).unwrap();
    }

    writeln!(out, "\nContent candidates:").unwrap();
    for c in analysis.content_candidates.iter().take(CONTENT_REPORT_LIMIT) {
        writeln!(out, "  {}: {} found, text length: {}", c.selector, c.count, c.text_length).unwrap();
    }

    writeln!(out, "\nAuthor candidates:").unwrap();
    for c in &analysis.author_candidates {
        writeln!(out, "  {}: {} found, text: {}", c.selector, c.count, c.first_text).unwrap();
    }
    out
}

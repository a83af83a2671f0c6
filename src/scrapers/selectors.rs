//! Field extraction for sspai post pages.
//!
//! Every field is resolved through a [`RuleChain`]: an ordered list of plain
//! `document -> Option<text>` locators. The first locator that yields
//! non-empty text wins; when none does, the record keeps its default
//! (see [`TITLE_NOT_FOUND`](crate::models::TITLE_NOT_FOUND) and
//! [`UNKNOWN_AUTHOR`](crate::models::UNKNOWN_AUTHOR)).
//!
//! The site has shipped at least two markup generations, so each chain holds
//! the current locator first and the older one as a fallback.

use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

/// A single locator strategy.
pub type Rule = fn(&Html) -> Option<String>;

/// Ordered locators for one field.
#[derive(Debug)]
pub struct RuleChain {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

impl RuleChain {
    /// Run the locators in order and return the first non-empty text.
    pub fn resolve(&self, document: &Html) -> Option<String> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            let text = rule(document).filter(|t| !t.is_empty())?;
            debug!(field = self.field, rule = index, "Locator matched");
            Some(text)
        })
    }
}

/// Elements whose text is never article text.
const NOISE_TAGS: [&str; 3] = ["script", "style", "figcaption"];

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static CSS selector must parse")
}

static TITLE_PRIMARY: Lazy<Selector> = Lazy::new(|| css("div#article-title.title"));
static TITLE_FALLBACK: Lazy<Selector> = Lazy::new(|| css("div.title"));
static CONTENT_PRIMARY: Lazy<Selector> = Lazy::new(|| css("div.content.wangEditor-txt"));
static CONTENT_FALLBACK: Lazy<Selector> = Lazy::new(|| css("div.content"));
static AUTHOR_PRIMARY: Lazy<Selector> =
    Lazy::new(|| css("a.ss__user__nickname__wrapper.nickname"));
static AUTHOR_FALLBACK: Lazy<Selector> = Lazy::new(|| css("div.ss__user__nickname"));
static AUTHOR_NAME: Lazy<Selector> = Lazy::new(|| css("span"));
static TIMER: Lazy<Selector> = Lazy::new(|| css("div.timer"));
static BODY_BLOCKS: Lazy<Selector> =
    Lazy::new(|| css("p, h1, h2, h3, h4, h5, h6, blockquote, ul, ol"));

pub static TITLE_CHAIN: RuleChain = RuleChain {
    field: "title",
    rules: &[title_primary, title_fallback],
};

pub static CONTENT_CHAIN: RuleChain = RuleChain {
    field: "content",
    rules: &[content_primary, content_fallback],
};

pub static AUTHOR_CHAIN: RuleChain = RuleChain {
    field: "author",
    rules: &[author_primary, author_fallback],
};

pub static PUBLISH_TIME_CHAIN: RuleChain = RuleChain {
    field: "publish_time",
    rules: &[publish_time],
};

fn title_primary(document: &Html) -> Option<String> {
    first_text(document, &TITLE_PRIMARY)
}

fn title_fallback(document: &Html) -> Option<String> {
    first_text(document, &TITLE_FALLBACK)
}

fn content_primary(document: &Html) -> Option<String> {
    document.select(&CONTENT_PRIMARY).next().map(body_text)
}

fn content_fallback(document: &Html) -> Option<String> {
    document.select(&CONTENT_FALLBACK).next().map(body_text)
}

fn author_primary(document: &Html) -> Option<String> {
    author_in(document, &AUTHOR_PRIMARY)
}

fn author_fallback(document: &Html) -> Option<String> {
    author_in(document, &AUTHOR_FALLBACK)
}

fn publish_time(document: &Html) -> Option<String> {
    first_text(document, &TIMER)
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

// The nickname wrapper sometimes nests the name in a span next to badges.
fn author_in(document: &Html, selector: &Selector) -> Option<String> {
    let wrapper = document.select(selector).next()?;
    let name = wrapper.select(&AUTHOR_NAME).next().unwrap_or(wrapper);
    Some(name.text().collect::<String>().trim().to_string())
}

/// Plain text of a content container: one paragraph per non-empty block,
/// in document order, separated by a blank line.
pub fn body_text(container: ElementRef<'_>) -> String {
    container
        .select(&BODY_BLOCKS)
        .filter(|block| !inside_noise(*block, container))
        .filter_map(|block| {
            let mut text = String::new();
            push_visible_text(block, &mut text);
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn is_noise(el: &ElementRef<'_>) -> bool {
    NOISE_TAGS.contains(&el.value().name())
}

fn inside_noise(block: ElementRef<'_>, container: ElementRef<'_>) -> bool {
    block
        .ancestors()
        .take_while(|node| node.id() != container.id())
        .filter_map(ElementRef::wrap)
        .any(|el| is_noise(&el))
}

fn push_visible_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if !is_noise(&child_el) {
                        push_visible_text(child_el, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Parse `html` and fill the text fields of `record`.
///
/// Fields whose chain misses keep the value already on the record.
pub fn extract_into(record: &mut ArticleRecord, html: &str) {
    let document = Html::parse_document(html);

    if let Some(title) = TITLE_CHAIN.resolve(&document) {
        record.title = title;
    }
    if let Some(content) = CONTENT_CHAIN.resolve(&document) {
        record.content = content;
    }
    if let Some(author) = AUTHOR_CHAIN.resolve(&document) {
        record.author = author;
    }
    if let Some(time) = PUBLISH_TIME_CHAIN.resolve(&document) {
        record.publish_time = time;
    }
}

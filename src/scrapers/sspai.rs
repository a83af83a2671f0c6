//! sspai.com post fetcher.
//!
//! Posts live at `https://sspai.com/post/{id}` with sequential numeric ids,
//! so the whole archive can be walked without an index page. Each call makes
//! exactly one GET request; nothing is cached or retried.

use super::selectors::extract_into;
use crate::error::{ConfigError, FetchError};
use crate::models::ArticleRecord;
use crate::utils::with_trailing_slash;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Site root used when none is configured.
pub const DEFAULT_SITE: &str = "https://sspai.com";

/// The site serves a reduced page to unknown agents, so pose as a desktop browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of article records keyed by identifier.
pub trait FetchArticle {
    /// Fetch and extract the article with the given id.
    async fn fetch(&self, id: &str) -> Result<ArticleRecord, FetchError>;
}

/// Fetches posts from an sspai-style site.
#[derive(Debug, Clone)]
pub struct SspaiFetcher {
    client: Client,
    site: Url,
}

impl SspaiFetcher {
    /// Build a fetcher rooted at `site` (for example [`DEFAULT_SITE`]).
    pub fn new(site: &str) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        let site = with_trailing_slash(Url::parse(site)?);
        Ok(Self { client, site })
    }

    /// Canonical URL for `id`.
    pub fn article_url(&self, id: &str) -> Result<Url, url::ParseError> {
        self.site.join(&format!("post/{id}"))
    }
}

impl FetchArticle for SspaiFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, id: &str) -> Result<ArticleRecord, FetchError> {
        let url = self.article_url(id)?;
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;

        let mut record = ArticleRecord::new(id, url.as_str());
        extract_into(&mut record, &body);

        info!(
            %url,
            title = %record.title,
            bytes = record.content.len(),
            "Fetched article"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const PAGE: &str = r#"
        <html><body>
          <div id="article-title" class="title">Test Post</div>
          <a class="ss__user__nickname__wrapper nickname"><span>Writer</span></a>
          <div class="timer">2 days ago</div>
          <div class="content wangEditor-txt"><p>One.</p><p>Two.</p></div>
        </body></html>
    "#;

    #[test]
    fn test_article_url_is_derived_from_id() {
        let fetcher = SspaiFetcher::new(DEFAULT_SITE).unwrap();
        assert_eq!(
            fetcher.article_url("92777").unwrap().as_str(),
            "https://sspai.com/post/92777"
        );
    }

    #[test]
    fn test_article_url_keeps_site_path() {
        let fetcher = SspaiFetcher::new("http://mirror.local/archive").unwrap();
        assert_eq!(
            fetcher.article_url("7").unwrap().as_str(),
            "http://mirror.local/archive/post/7"
        );
    }

    #[test]
    fn test_invalid_site_is_config_error() {
        assert!(matches!(
            SspaiFetcher::new("not a url"),
            Err(ConfigError::BaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/post/42")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(PAGE)
            .expect(1)
            .create_async()
            .await;

        let fetcher = SspaiFetcher::new(&server.url()).unwrap();
        let record = fetcher.fetch("42").await.unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.url, format!("{}/post/42", server.url()));
        assert_eq!(record.title, "Test Post");
        assert_eq!(record.author, "Writer");
        assert_eq!(record.publish_time, "2 days ago");
        assert_eq!(record.content, "One.\n\nTwo.");
        assert!(!record.fetch_time.is_empty());
        assert!(record.summary.is_none());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/post/0")
            .with_status(404)
            .with_body("missing")
            .expect(1)
            .create_async()
            .await;

        let fetcher = SspaiFetcher::new(&server.url()).unwrap();
        let result = fetcher.fetch("0").await;

        assert!(matches!(
            result,
            Err(FetchError::Status(status)) if status == reqwest::StatusCode::NOT_FOUND
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_without_markup_is_still_a_record() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/post/3")
            .with_status(200)
            .with_body("<html><body>redesigned</body></html>")
            .create_async()
            .await;

        let fetcher = SspaiFetcher::new(&server.url()).unwrap();
        let record = fetcher.fetch("3").await.unwrap();
        assert_eq!(record.title, crate::models::TITLE_NOT_FOUND);
        assert_eq!(record.content, "");
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let fetcher = SspaiFetcher::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            fetcher.fetch("1").await,
            Err(FetchError::Transport(_))
        ));
    }
}

//! LLM API interaction.
//!
//! [`AskAsync`] is the seam between the summarizer and whatever produces
//! text. [`ChatClient`] implements it against an OpenAI-compatible
//! `chat/completions` endpoint. Failures are returned, never retried: the
//! summarizer has a local fallback and the walker has a rate limit to keep.

use crate::config::LlmSettings;
use crate::error::{ConfigError, SummaryError};
use crate::utils::{truncate_for_log, with_trailing_slash};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// System instruction sent with every summary request.
pub const SYSTEM_PROMPT: &str =
    "You are a professional summarization assistant who is good at extracting the core content of an article.";

/// Error bodies are kept in the error message only up to this length.
const ERROR_BODY_PREVIEW_CHARS: usize = 300;

/// Trait for async LLM interaction.
///
/// Implementors send text to a model and return its answer. Tests substitute
/// their own implementations to simulate outages.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send `text` as the user message and return the model's reply.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatClient {
    /// Build a client. A missing or blank `api_key` is a startup error.
    pub fn new(api_key: Option<String>, settings: &LlmSettings) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let endpoint = with_trailing_slash(Url::parse(&settings.base_url)?).join("chat/completions")?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    async fn complete(&self, text: &str) -> Result<String, SummaryError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: text },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Status {
                status,
                body: truncate_for_log(&body, ERROR_BODY_PREVIEW_CHARS),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(SummaryError::EmptyCompletion)
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AskAsync for ChatClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = self.complete(text).await;
        let dt = t0.elapsed();

        match &res {
            Ok(reply) => debug!(elapsed_ms = dt.as_millis(), chars = reply.chars().count(), "Chat completion succeeded"),
            Err(e) => warn!(elapsed_ms = dt.as_millis(), error = %e, "Chat completion failed"),
        }
        res.map_err(Into::into)
    }
}

//! Anthropic Generator - TextGenerator backed by Anthropic's Messages API.
//!
//! Each task is sent as a single user message with a persona system prompt:
//! the founder for the pitch, the named shark for questions and verdicts,
//! and a neutral host for the moderator recap.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_max_retries(2);
//!
//! let generator = AnthropicTextGenerator::new(config, Panel::classic())?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::panel::Panel;
use crate::ports::{context, GenerationError, GenerationRequest, TaskKind, TextGenerator};

/// Configuration for the Anthropic generator.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Upper bound on generated tokens per task.
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            max_tokens: 512,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Longest wait between retries.
const MAX_BACKOFF_SECS: u64 = 30;

/// Text generator that calls Anthropic's Messages API.
pub struct AnthropicTextGenerator {
    config: AnthropicConfig,
    panel: Panel,
    client: Client,
}

impl AnthropicTextGenerator {
    /// Creates a generator that speaks for the sharks on `panel`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: AnthropicConfig, panel: Panel) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            panel,
            client,
        })
    }

    /// Builds the messages endpoint URL.
    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// System prompt establishing who is speaking.
    fn system_prompt(&self, request: &GenerationRequest) -> String {
        match &request.task {
            TaskKind::Pitch => "You are an entrepreneur presenting on a televised investor panel. \
                Speak in the first person, confidently and concisely."
                .to_string(),
            TaskKind::Question { shark } | TaskKind::Verdict { shark } => {
                let persona = request
                    .field(context::PERSONA)
                    .map(str::to_string)
                    .or_else(|| self.panel.find(shark).map(|s| s.persona.clone()))
                    .unwrap_or_default();
                format!(
                    "You are {}, an investor on a televised pitch panel. {}. Stay in character.",
                    shark, persona
                )
            }
            TaskKind::ModeratorSummary => "You are the host of a televised investor panel. \
                Summarize the outcome for the audience, neutrally and briefly."
                .to_string(),
        }
    }

    /// User message describing the task, built from the context fields.
    fn task_prompt(request: &GenerationRequest) -> String {
        let field = |key: &str| request.field(key).unwrap_or("N/A");

        match &request.task {
            TaskKind::Pitch => format!(
                "Turn these notes into a short pitch for the panel.\n\nNotes: {}\n{}",
                field(context::PITCH_TEXT),
                field(context::INVESTMENT_REQUEST)
            ),
            TaskKind::Question { .. } => format!(
                "Ask the founder exactly one pointed question about this pitch. \
                 Reply with the question only.\n\n{}",
                field(context::PITCH)
            ),
            TaskKind::Verdict { .. } => format!(
                "Based on the conversation below, decide whether you invest. \
                 Start with \"Yes\" or \"No\", then state your terms or reason in one \
                 or two sentences.\n\n{}",
                field(context::CONVERSATION)
            ),
            TaskKind::ModeratorSummary => format!(
                "Recap the round in a few sentences.\n\nConversation:\n{}\n\nOffers:\n{}",
                field(context::CONVERSATION),
                field(context::OFFERS)
            ),
        }
    }

    fn to_anthropic_request(&self, request: &GenerationRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.config.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: Self::task_prompt(request),
            }],
            system: Some(self.system_prompt(request)),
            max_tokens: self.config.max_tokens,
        }
    }

    /// Sends a request and handles transport failures.
    async fn send_request(&self, body: &AnthropicRequest) -> Result<Response, GenerationError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })
    }

    /// Maps a non-success status to an error.
    async fn handle_response_status(response: Response) -> Result<Response, GenerationError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(GenerationError::AuthenticationFailed),
            429 => Err(GenerationError::rate_limited(parse_retry_after(&error_body))),
            400 => Err(GenerationError::InvalidRequest(error_body)),
            500..=599 => Err(GenerationError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(GenerationError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn parse_response(response: Response) -> Result<String, GenerationError> {
        let response = Self::handle_response_status(response).await?;

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::parse(format!("Failed to parse response: {}", e)))?;

        let text = collect_text(anthropic_response.content);
        if text.trim().is_empty() {
            return Err(GenerationError::parse("response contained no text"));
        }
        Ok(text.trim().to_string())
    }

    async fn attempt(&self, body: &AnthropicRequest) -> Result<String, GenerationError> {
        let response = self.send_request(body).await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl TextGenerator for AnthropicTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = self.to_anthropic_request(&request);
        let mut retry_count = 0;

        loop {
            debug!(task = %request.task, attempt = retry_count + 1, "Calling Anthropic");

            match self.attempt(&body).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    warn!(task = %request.task, error = %err, "Retrying generation");
                }
                Err(err) => return Err(err),
            }

            sleep(backoff_delay(retry_count)).await;
            retry_count += 1;
        }
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}

/// Exponential backoff (1s, 2s, 4s, ...) capped at `MAX_BACKOFF_SECS`.
fn backoff_delay(retry_count: u32) -> Duration {
    Duration::from_secs((1u64 << retry_count.min(5)).min(MAX_BACKOFF_SECS))
}

/// Parses retry-after seconds from an error body, defaulting to 60.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let message = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = message.find("try again in ")?;
            let digits: String = message[idx + 13..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().ok()
        })
        .unwrap_or(60)
}

/// Concatenates the text blocks of a response.
fn collect_text(blocks: Vec<ContentBlock>) -> String {
    blocks
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("")
}

// ════════════════════════════════════════════════════════════════════════════════
// Anthropic API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const OK_BODY: &str = r#"{"content":[{"type":"text","text":"Hello shark"}]}"#;

    fn generator() -> AnthropicTextGenerator {
        AnthropicTextGenerator::new(
            AnthropicConfig::new("test-key").with_base_url("http://localhost:9/"),
            Panel::classic(),
        )
        .unwrap()
    }

    #[test]
    fn config_builder_sets_fields() {
        let config = AnthropicConfig::new("key")
            .with_model("claude-3-haiku-20240307")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1);

        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn config_debug_redacts_key() {
        let config = AnthropicConfig::new("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn messages_url_strips_trailing_slash() {
        assert_eq!(generator().messages_url(), "http://localhost:9/v1/messages");
    }

    #[test]
    fn shark_system_prompt_uses_panel_persona() {
        let request = GenerationRequest::new(TaskKind::Question {
            shark: "Kevin O'Leary".into(),
        });

        let prompt = generator().system_prompt(&request);

        assert!(prompt.starts_with("You are Kevin O'Leary"));
        assert!(prompt.contains("royalt"));
    }

    #[test]
    fn verdict_prompt_embeds_conversation() {
        let request = GenerationRequest::new(TaskKind::Verdict {
            shark: "Lori Greiner".into(),
        })
        .with_context(context::CONVERSATION, "Session #1\nPitch: Socks");

        let body = generator().to_anthropic_request(&request);

        assert_eq!(body.messages.len(), 1);
        assert!(body.messages[0].content.contains("Pitch: Socks"));
        assert!(body.system.unwrap().contains("Lori Greiner"));
    }

    #[test]
    fn parses_retry_after_hint() {
        let body = r#"{"error":{"message":"Rate limited, try again in 12s"}}"#;
        assert_eq!(parse_retry_after(body), 12);
        assert_eq!(parse_retry_after("not json"), 60);
    }

    #[test]
    fn collects_only_text_blocks() {
        let blocks = vec![
            ContentBlock {
                block_type: "text".into(),
                text: Some("What are ".into()),
            },
            ContentBlock {
                block_type: "tool_use".into(),
                text: None,
            },
            ContentBlock {
                block_type: "text".into(),
                text: Some("your margins?".into()),
            },
        ];
        assert_eq!(collect_text(blocks), "What are your margins?");
    }

    // ════════════════════════════════════════════════════════════════════════
    // HTTP behavior against a local stub server
    // ════════════════════════════════════════════════════════════════════════

    /// Reads one HTTP request: headers, then `content-length` bytes of body.
    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return;
                }
            }
        }
    }

    /// Serves `replies` in order, repeating the last one. Returns the base URL
    /// and a counter of requests received.
    async fn stub_server(replies: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                read_request(&mut stream).await;
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = replies[index.min(replies.len() - 1)];
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, hits)
    }

    fn stub_generator(url: &str, max_retries: u32) -> AnthropicTextGenerator {
        AnthropicTextGenerator::new(
            AnthropicConfig::new("test-key")
                .with_base_url(url)
                .with_timeout(Duration::from_secs(10))
                .with_max_retries(max_retries),
            Panel::classic(),
        )
        .unwrap()
    }

    fn question() -> GenerationRequest {
        GenerationRequest::new(TaskKind::Question {
            shark: "Mark Cuban".into(),
        })
        .with_context(context::PITCH, "Solar coolers")
    }

    #[tokio::test]
    async fn server_error_is_retried_until_success() {
        let (url, hits) = stub_server(vec![(503, r#"{"error":"overloaded"}"#), (200, OK_BODY)]).await;

        let result = stub_generator(&url, 1).generate(question()).await;

        assert_eq!(result, Ok("Hello shark".to_string()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn authentication_failure_is_not_retried() {
        let (url, hits) = stub_server(vec![(401, r#"{"error":"bad key"}"#), (200, OK_BODY)]).await;

        let result = stub_generator(&url, 3).generate(question()).await;

        assert_eq!(result, Err(GenerationError::AuthenticationFailed));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_past_max_retries_surface_unavailable() {
        let (url, hits) = stub_server(vec![(503, r#"{"error":"overloaded"}"#)]).await;

        let err = stub_generator(&url, 1).generate(question()).await.unwrap_err();

        assert!(matches!(err, GenerationError::Unavailable { ref message } if message.contains("503")));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bad_request_maps_to_invalid_request() {
        let (url, hits) = stub_server(vec![(400, "max_tokens too large")]).await;

        let err = stub_generator(&url, 3).generate(question()).await.unwrap_err();

        assert_eq!(err, GenerationError::InvalidRequest("max_tokens too large".into()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(5), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(200), Duration::from_secs(MAX_BACKOFF_SECS));
    }
}

//! Text Generator Port - Interface for the text-generation collaborator.
//!
//! Everything the sharks and the moderator say comes from an implementation
//! of this port. The contract is deliberately small: given a task kind and
//! some named context fields, return natural-language text.
//!
//! # Design
//!
//! - One blocking-from-the-caller's-view call per task; may be slow
//! - Provider-agnostic request format
//! - Error types for the common failure modes (rate limits, outages, auth)
//!
//! # Example
//!
//! ```ignore
//! let request = GenerationRequest::new(TaskKind::Question { shark: "Mark Cuban".into() })
//!     .with_context("pitch", pitch_text);
//!
//! let question = generator.generate(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

/// Port for text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for one task.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Short name of the backing provider, for logs.
    fn provider_name(&self) -> &str;
}

/// What the generator is being asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// The founder's polished pitch presentation.
    Pitch,
    /// One shark's question about the pitch.
    Question { shark: String },
    /// One shark's verdict after the Q&A.
    Verdict { shark: String },
    /// The moderator's recap of all offers.
    ModeratorSummary,
}

impl TaskKind {
    /// Name of the speaker for this task.
    pub fn speaker(&self) -> &str {
        match self {
            TaskKind::Pitch => "Entrepreneur",
            TaskKind::Question { shark } | TaskKind::Verdict { shark } => shark,
            TaskKind::ModeratorSummary => crate::domain::panel::MODERATOR,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Pitch => write!(f, "pitch"),
            TaskKind::Question { shark } => write!(f, "question:{}", shark),
            TaskKind::Verdict { shark } => write!(f, "verdict:{}", shark),
            TaskKind::ModeratorSummary => write!(f, "moderator_summary"),
        }
    }
}

/// Well-known context field names.
pub mod context {
    /// The founder's pitch as presented.
    pub const PITCH: &str = "pitch";
    /// The raw pitch text typed by the user.
    pub const PITCH_TEXT: &str = "pitch_text";
    /// Requested amount and equity, as one line.
    pub const INVESTMENT_REQUEST: &str = "investment_request";
    /// Persona description of the speaking shark.
    pub const PERSONA: &str = "persona";
    /// Rendered Q&A transcript.
    pub const CONVERSATION: &str = "conversation_summary";
    /// Rendered verdicts of every shark.
    pub const OFFERS: &str = "offers";
}

/// Request for one generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub task: TaskKind,
    /// Named context fields, in key order.
    pub context: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn new(task: TaskKind) -> Self {
        Self {
            task,
            context: BTreeMap::new(),
        }
    }

    /// Adds a context field.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Returns a context field.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

/// Text generation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl GenerationError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn TextGenerator) {}
    }

    #[test]
    fn request_builder_collects_context() {
        let request = GenerationRequest::new(TaskKind::Pitch)
            .with_context(context::PITCH_TEXT, "Glow-in-the-dark socks")
            .with_context(context::INVESTMENT_REQUEST, "$10 for 1%");

        assert_eq!(request.field(context::PITCH_TEXT), Some("Glow-in-the-dark socks"));
        assert_eq!(request.context.len(), 2);
        assert!(request.field("missing").is_none());
    }

    #[test]
    fn speaker_follows_task() {
        assert_eq!(TaskKind::Question { shark: "Lori Greiner".into() }.speaker(), "Lori Greiner");
        assert_eq!(TaskKind::ModeratorSummary.speaker(), "Moderator");
    }

    #[test]
    fn retryable_errors() {
        assert!(GenerationError::rate_limited(5).is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 3 }.is_retryable());
        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::parse("bad json").is_retryable());
    }

    #[test]
    fn task_kind_display() {
        assert_eq!(TaskKind::Verdict { shark: "Daymond John".into() }.to_string(), "verdict:Daymond John");
    }
}

//! Port to the text-generation service.

use async_trait::async_trait;
use thiserror::Error;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// The end user.
    User,
    /// The model.
    Model,
}

impl TurnRole {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One turn of a conversation sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Author.
    pub role: TurnRole,
    /// Text content.
    pub text: String,
}

impl Turn {
    /// A user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// A model turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Top-k cutoff.
    pub top_k: u32,
    /// Nucleus cutoff.
    pub top_p: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Near-deterministic settings for structured split answers.
    #[must_use]
    pub const fn split() -> Self {
        Self {
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 256,
        }
    }

    /// Conversational settings for chat.
    #[must_use]
    pub const fn chat() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// A complete generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Conversation, oldest first. The last turn is the user's prompt.
    pub contents: Vec<Turn>,
    /// Sampling parameters.
    pub config: GenerationConfig,
}

/// Failures of the reasoning service.
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// The request could not be sent or the connection failed.
    #[error("reasoning request failed: {0}")]
    Transport(String),

    /// No answer within the configured timeout.
    #[error("reasoning request timed out")]
    Timeout,

    /// Upstream answered with a non-success status.
    #[error("reasoning service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the logs.
        body: String,
    },

    /// The response carried no candidate text.
    #[error("reasoning service returned no text")]
    EmptyResponse,

    /// The response body could not be decoded.
    #[error("invalid reasoning response: {0}")]
    InvalidResponse(String),
}

/// "Given a structured prompt, return free text."
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Runs one generation and returns the first candidate's text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ReasoningError>;
}

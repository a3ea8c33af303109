//! Conversational coaching.

use std::fmt::Write as _;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use super::prompt::CHAT_SYSTEM_PROMPT;
use super::reasoning::{GenerationConfig, GenerationRequest, ReasoningClient, ReasoningError, Turn};
use crate::budget::Category;
use crate::progress::Progress;
use nestegg_shared::AppError;

/// How many earlier turns are forwarded upstream.
pub const HISTORY_WINDOW: usize = 10;

/// A prior chat message as sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    /// `"user"` for the user; anything else is treated as the model.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    fn to_turn(&self) -> Turn {
        if self.role == "user" {
            Turn::user(self.content.clone())
        } else {
            Turn::model(self.content.clone())
        }
    }
}

/// What the assistant knows about the user's finances.
#[derive(Debug, Clone, Default)]
pub struct ChatContext {
    /// Category names with their budgeted sizes.
    pub categories: Vec<(String, Decimal)>,
    /// Current baby step, if tracked.
    pub current_step: Option<i32>,
}

impl ChatContext {
    /// Builds the context from stored records.
    #[must_use]
    pub fn new(categories: &[Category], progress: Option<&Progress>) -> Self {
        Self {
            categories: categories
                .iter()
                .map(|c| (c.name.clone(), c.size))
                .collect(),
            current_step: progress.map(|p| p.current_step),
        }
    }

    /// Renders the context block embedded in the system prompt.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("User Financial Context:\n");
        if self.categories.is_empty() {
            out.push_str("No budget categories set yet");
        } else {
            let listed = self
                .categories
                .iter()
                .map(|(name, size)| format!("{name} (${})", size.normalize()))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(out, "Budget Categories: {listed}");
        }
        out.push('\n');
        match self.current_step {
            Some(step) => {
                let _ = write!(out, "Current Financial Step: {step}");
            }
            None => out.push_str("No progress tracked yet"),
        }
        out
    }
}

/// Chat errors.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Message is blank.
    #[error("Message is required")]
    EmptyMessage,

    /// The reasoning service failed.
    #[error(transparent)]
    Upstream(#[from] ReasoningError),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => Self::Validation(err.to_string()),
            ChatError::Upstream(_) => {
                Self::ExternalService("Failed to get response from AI".to_string())
            }
        }
    }
}

/// Answers free-form money questions with the user's context attached.
pub struct ChatAdvisor {
    client: Arc<dyn ReasoningClient>,
}

impl ChatAdvisor {
    /// Creates a new chat advisor.
    #[must_use]
    pub fn new(client: Arc<dyn ReasoningClient>) -> Self {
        Self { client }
    }

    /// Produces the assistant's reply to `message`.
    ///
    /// Only the last [`HISTORY_WINDOW`] history entries are sent. When there
    /// is no history the system prompt and context lead the message.
    ///
    /// # Errors
    ///
    /// Returns `EmptyMessage` for a blank message and `Upstream` when the
    /// reasoning service fails.
    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatMessage],
        context: &ChatContext,
    ) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        let mut contents: Vec<Turn> = recent.iter().map(ChatMessage::to_turn).collect();

        let prompt = if recent.is_empty() {
            format!(
                "{CHAT_SYSTEM_PROMPT}\n\n{}\n\nBased on the user's financial context above, provide personalized advice.\n\nUser question: {message}",
                context.render()
            )
        } else {
            message.to_string()
        };
        contents.push(Turn::user(prompt));

        let request = GenerationRequest {
            contents,
            config: GenerationConfig::chat(),
        };
        debug!(turns = request.contents.len(), "Sending chat request");

        self.client.generate(&request).await.map_err(|e| {
            error!(error = %e, "Chat request failed");
            ChatError::Upstream(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::reasoning::TurnRole;
    use crate::memory::ScriptedReasoner;
    use rust_decimal_macros::dec;

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { "user" } else { "assistant" }.to_string(),
                content: format!("turn {i}"),
            })
            .collect()
    }

    #[test]
    fn test_context_render() {
        let context = ChatContext {
            categories: vec![("Rent".into(), dec!(1200.00)), ("Food".into(), dec!(350.5))],
            current_step: Some(2),
        };
        assert_eq!(
            context.render(),
            "User Financial Context:\nBudget Categories: Rent ($1200), Food ($350.5)\nCurrent Financial Step: 2"
        );

        assert_eq!(
            ChatContext::default().render(),
            "User Financial Context:\nNo budget categories set yet\nNo progress tracked yet"
        );
    }

    #[tokio::test]
    async fn test_first_turn_carries_system_prompt() {
        let reasoner = Arc::new(ScriptedReasoner::new(vec![Ok("Hello!".to_string())]));
        let advisor = ChatAdvisor::new(reasoner.clone());

        let reply = advisor
            .respond("Should I buy a car?", &[], &ChatContext::default())
            .await
            .unwrap();
        assert_eq!(reply, "Hello!");

        let requests = reasoner.requests().await;
        let contents = &requests[0].contents;
        assert_eq!(contents.len(), 1);
        assert!(contents[0].text.starts_with("You are a helpful financial assistant"));
        assert!(contents[0].text.contains("No budget categories set yet"));
        assert!(contents[0].text.ends_with("User question: Should I buy a car?"));
        assert_eq!(requests[0].config.max_output_tokens, 1024);
    }

    #[tokio::test]
    async fn test_history_is_windowed_and_roles_mapped() {
        let reasoner = Arc::new(ScriptedReasoner::new(vec![Ok("ok".to_string())]));
        let advisor = ChatAdvisor::new(reasoner.clone());

        advisor
            .respond("And now?", &history(13), &ChatContext::default())
            .await
            .unwrap();

        let requests = reasoner.requests().await;
        let contents = &requests[0].contents;
        assert_eq!(contents.len(), HISTORY_WINDOW + 1);
        assert_eq!(contents[0].text, "turn 3");
        assert_eq!(contents[0].role, TurnRole::Model);
        assert_eq!(contents[1].role, TurnRole::User);
        assert_eq!(contents[HISTORY_WINDOW].text, "And now?");
        assert_eq!(contents[HISTORY_WINDOW].role, TurnRole::User);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let advisor = ChatAdvisor::new(Arc::new(ScriptedReasoner::new(vec![])));
        let err = advisor
            .respond("  ", &[], &ChatContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_surfaced() {
        let advisor = ChatAdvisor::new(Arc::new(ScriptedReasoner::new(vec![Err(
            ReasoningError::Timeout,
        )])));
        let err = advisor
            .respond("hi", &[], &ChatContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Upstream(ReasoningError::Timeout)));
        assert_eq!(AppError::from(err).status_code(), 502);
    }
}

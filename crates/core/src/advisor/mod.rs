//! Advice from the external reasoning service.
//!
//! - Equity/debt split proposals for goals, with a parse-or-fallback policy
//!   so a misbehaving upstream never fails goal creation
//! - Conversational coaching that surfaces upstream failures to the caller

pub mod chat;
pub mod parse;
pub mod prompt;
pub mod reasoning;
pub mod service;

pub use chat::{ChatAdvisor, ChatContext, ChatError, ChatMessage};
pub use reasoning::{
    GenerationConfig, GenerationRequest, ReasoningClient, ReasoningError, Turn, TurnRole,
};
pub use service::{SplitAdvisor, SplitProposal, normalize};

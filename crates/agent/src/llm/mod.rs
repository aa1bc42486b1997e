//! LLM tool-calling capability.
//!
//! The pipeline talks to the model through the [`LlmChat`] trait; the
//! production implementation is [`ClaudeClient`] over the Anthropic Messages
//! API. Three call sites exist per request: intent extraction and top-3
//! selection (both forced tool calls) and the final free-text narration.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::ClaudeClient;
pub use error::{ApiErrorResponse, LlmError};
pub use types::{
    ChatRequest, ChatResponse, ContentBlock, Message, MessageContent, StopReason, Tool,
    ToolChoice, Usage,
};

/// Chat capability handle.
///
/// Explicitly passed into each stage (never an ambient singleton) so tests
/// can substitute deterministic stubs.
#[async_trait]
pub trait LlmChat: Send + Sync {
    /// Send one conversation turn.
    ///
    /// `tool_choice` of [`ToolChoice::Tool`] forces a structured call to the
    /// named tool; `None` leaves the model free to answer in text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport or API failure.
    async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Option<Vec<Tool>>,
        tool_choice: Option<ToolChoice>,
    ) -> Result<ChatResponse, LlmError>;
}

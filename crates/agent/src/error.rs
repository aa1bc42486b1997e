//! Error taxonomy for one request's pipeline.
//!
//! Each stage either fully succeeds or raises one of these; no stage
//! substitutes default data for a required field. The boundary layer renders
//! every variant through [`AgentError::user_message`].

use thiserror::Error;

use scout_core::ItemDetail;
use scout_marketplace::RetrievalError;

use crate::config::ConfigError;
use crate::llm::LlmError;

/// Errors surfaced by the shopping agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Missing or invalid configuration; fatal, surfaced before any call.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The model never produced a valid intent tool call, even after the
    /// clarifying retry.
    #[error("could not derive a search intent: {0}")]
    IntentParse(String),

    /// The search rendered zero rows. Terminal, but not a fault.
    #[error("no matching items found")]
    NoResults,

    /// Marketplace retrieval failed at batch level.
    #[error("marketplace retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    /// The model violated the selection contract, even after the corrective
    /// retry.
    #[error("selection failed: {0}")]
    Selection(String),

    /// The final narration call failed. The already-enriched products are
    /// carried along so retrieved data is not discarded.
    #[error("response generation failed: {source}")]
    ResponseGeneration {
        /// Products that were enriched before the narration failed.
        products: Vec<ItemDetail>,
        /// The underlying LLM failure.
        #[source]
        source: LlmError,
    },

    /// An LLM call failed outright (transport/API fault).
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    /// The request exceeded its overall wall-clock budget.
    #[error("request exceeded the {0}s budget")]
    Timeout(u64),
}

impl AgentError {
    /// Short apologetic message for the boundary layer.
    ///
    /// The success path mirrors the user's language via the responder; error
    /// paths fall back to the default language.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Sorry, the agent is not configured correctly.",
            Self::IntentParse(_) => "Sorry, I could not understand that request.",
            Self::NoResults => "Sorry, I found no matching items on the marketplace.",
            Self::Retrieval(_) => "Sorry, I could not retrieve the item details.",
            Self::Selection(_) | Self::Llm(_) => "Sorry, something went wrong while picking items.",
            Self::ResponseGeneration { .. } => {
                "Sorry, I could not write up a summary, but here is what I found."
            }
            Self::Timeout(_) => "Sorry, that request took too long and was cancelled.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(AgentError::NoResults.to_string(), "no matching items found");
        assert_eq!(
            AgentError::Timeout(120).to_string(),
            "request exceeded the 120s budget"
        );
    }

    #[test]
    fn test_user_message_never_empty() {
        let errors = [
            AgentError::IntentParse("free text".to_string()),
            AgentError::NoResults,
            AgentError::Selection("bad id".to_string()),
            AgentError::Timeout(120),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}

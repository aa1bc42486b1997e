//! The end-to-end shopping agent.
//!
//! One [`ShoppingAgent`] handles any number of independent requests; each
//! request runs the five stages in order under a single wall-clock budget.
//! No state survives between requests.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use scout_core::AgentResponse;
use scout_marketplace::{HttpRenderer, Marketplace, MercariClient};

use crate::config::ScoutConfig;
use crate::enricher::enrich;
use crate::error::AgentError;
use crate::interpreter::interpret;
use crate::llm::{ClaudeClient, LlmChat};
use crate::responder::respond;
use crate::retrieval::retrieve;
use crate::selector::select;

/// LLM shopping agent over a second-hand marketplace.
///
/// Holds its capabilities behind trait objects so tests can swap in stubs.
pub struct ShoppingAgent {
    llm: Arc<dyn LlmChat>,
    marketplace: Arc<dyn Marketplace>,
    request_timeout: Duration,
}

impl ShoppingAgent {
    /// Build an agent from explicit capability handles.
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmChat>,
        marketplace: Arc<dyn Marketplace>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            marketplace,
            request_timeout,
        }
    }

    /// Build the production agent: Claude for reasoning, Mercari over the
    /// HTTP renderer for retrieval.
    #[must_use]
    pub fn from_config(config: &ScoutConfig) -> Self {
        let renderer = Arc::new(HttpRenderer::new());
        let marketplace = MercariClient::with_limits(renderer, config.result_cap, config.field_wait);
        Self::new(
            Arc::new(ClaudeClient::new(config)),
            Arc::new(marketplace),
            config.request_timeout,
        )
    }

    /// Handle one shopping request end to end.
    ///
    /// # Errors
    ///
    /// Returns the stage error that stopped the pipeline, or
    /// [`AgentError::Timeout`] when the whole request overruns its budget.
    #[instrument(skip_all)]
    pub async fn handle(&self, utterance: &str) -> Result<AgentResponse, AgentError> {
        let budget = self.request_timeout;
        tokio::time::timeout(budget, self.run(utterance))
            .await
            .map_err(|_| AgentError::Timeout(budget.as_secs()))?
    }

    async fn run(&self, utterance: &str) -> Result<AgentResponse, AgentError> {
        let intent = interpret(self.llm.as_ref(), utterance).await?;
        let candidates = retrieve(self.marketplace.as_ref(), &intent).await?;
        let picks = select(self.llm.as_ref(), &intent, &candidates).await?;
        let recommendations = enrich(self.marketplace.as_ref(), picks).await?;
        let response = respond(self.llm.as_ref(), utterance, &intent, recommendations).await?;
        info!(products = response.products.len(), "request complete");
        Ok(response)
    }
}

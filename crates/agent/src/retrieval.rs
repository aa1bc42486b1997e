//! Retrieval stage.
//!
//! Runs the marketplace search for the interpreted intent. A search that
//! succeeds but matches nothing is a terminal, non-fault outcome
//! ([`AgentError::NoResults`]), distinct from transport failure.

use tracing::{info, instrument};

use scout_core::{ItemSummary, SearchIntent};
use scout_marketplace::Marketplace;

use crate::error::AgentError;

/// Search the marketplace for candidates matching `intent`.
///
/// # Errors
///
/// Returns [`AgentError::NoResults`] when the search matches nothing, or
/// [`AgentError::Retrieval`] when the search itself fails.
#[instrument(skip(marketplace, intent), fields(query = %intent.query()))]
pub async fn retrieve(
    marketplace: &dyn Marketplace,
    intent: &SearchIntent,
) -> Result<Vec<ItemSummary>, AgentError> {
    let candidates = marketplace.search(intent).await?;
    if candidates.is_empty() {
        return Err(AgentError::NoResults);
    }
    info!(count = candidates.len(), "retrieved candidates");
    Ok(candidates)
}

//! Enrichment stage.
//!
//! Fetches the full detail page for each picked listing. Listings vanish
//! between search and fetch on a live marketplace, so a single failed fetch
//! drops that slot and the response shrinks; only when every pick fails does
//! the stage escalate to a batch error.

use tracing::{instrument, warn};

use scout_core::Recommendation;
use scout_marketplace::{Marketplace, RetrievalError};

use crate::error::AgentError;
use crate::tools::Pick;

/// Fetch full details for the picked listings, preserving rank order.
///
/// # Errors
///
/// Returns [`AgentError::Retrieval`] carrying
/// [`RetrievalError::AllItemsFailed`] when every pick fails to enrich.
#[instrument(skip_all, fields(picks = picks.len()))]
pub async fn enrich(
    marketplace: &dyn Marketplace,
    picks: Vec<Pick>,
) -> Result<Vec<Recommendation>, AgentError> {
    let attempted = picks.len();
    let mut recommendations = Vec::with_capacity(attempted);

    for pick in picks {
        match marketplace.fetch_detail(&pick.item_id).await {
            Ok(item) => recommendations.push(Recommendation {
                item,
                reason: pick.reason,
            }),
            Err(err) => {
                warn!(item_id = %pick.item_id, %err, "dropping pick, detail fetch failed");
            }
        }
    }

    if recommendations.is_empty() && attempted > 0 {
        return Err(AgentError::Retrieval(RetrievalError::AllItemsFailed {
            attempted,
        }));
    }

    Ok(recommendations)
}

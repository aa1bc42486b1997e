//! Selection stage.
//!
//! Ranks the retrieved candidates down to the top three via a forced call to
//! the `pick_top_items` tool. The validator rejects fabricated ids, duplicate
//! ids, and wrong pick counts; one corrective retry is granted before the
//! stage fails.
//!
//! When fewer than three candidates exist there is nothing to rank: every
//! candidate is passed through in retrieval order without an LLM call.

use serde_json::json;
use tracing::{debug, instrument, warn};

use scout_core::{ItemSummary, SearchIntent};

use crate::error::AgentError;
use crate::llm::{LlmChat, Message, ToolChoice};
use crate::tools::{Pick, SELECTION_TOOL, parse_selection_call, selection_tool};

/// How many recommendations a response carries at most.
pub const TOP_K: usize = 3;

const SYSTEM_PROMPT: &str = "You are a shopping assistant ranking second-hand listings \
    for a buyer. Call the pick_top_items tool with your picks, best first. Judge each \
    listing against the buyer's intent on price, condition, and how well the title \
    matches what they asked for. Copy item ids exactly from the candidate list.";

/// Pick the top-k candidates for the intent.
///
/// # Errors
///
/// Returns [`AgentError::Selection`] when the model fails to produce a valid
/// `pick_top_items` call in two attempts, or [`AgentError::Llm`] on transport
/// failure.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn select(
    llm: &dyn LlmChat,
    intent: &SearchIntent,
    candidates: &[ItemSummary],
) -> Result<Vec<Pick>, AgentError> {
    if candidates.len() < TOP_K {
        debug!("fewer candidates than picks, passing all through");
        return Ok(candidates
            .iter()
            .map(|c| Pick {
                item_id: c.id.clone(),
                reason: "One of the only listings matching this search".to_string(),
            })
            .collect());
    }

    let prompt = format!(
        "The buyer wants:\n{}\n\nCandidate listings:\n{}",
        serde_json::to_string_pretty(intent).unwrap_or_else(|_| intent.query()),
        candidate_digest(candidates),
    );

    let mut last_err = String::from("no tool call in response");

    for attempt in 1..=2u32 {
        let system = if attempt == 1 {
            SYSTEM_PROMPT.to_string()
        } else {
            format!("{SYSTEM_PROMPT}\n\nYour previous picks were rejected: {last_err}. Try again.")
        };

        let response = llm
            .chat(
                vec![Message::user(prompt.clone())],
                Some(system),
                Some(vec![selection_tool(TOP_K)]),
                Some(ToolChoice::Tool {
                    name: SELECTION_TOOL.to_string(),
                }),
            )
            .await?;

        match response
            .tool_input(SELECTION_TOOL)
            .map(|input| parse_selection_call(input, candidates, TOP_K))
        {
            Some(Ok(picks)) => return Ok(picks),
            Some(Err(err)) => {
                warn!(attempt, %err, "selection payload rejected");
                last_err = err;
            }
            None => {
                warn!(attempt, "response carried no pick_top_items call");
                last_err = String::from("no pick_top_items tool call in response");
            }
        }
    }

    Err(AgentError::Selection(last_err))
}

/// One JSON line per candidate, keeping the prompt compact and the ids
/// unambiguous.
fn candidate_digest(candidates: &[ItemSummary]) -> String {
    candidates
        .iter()
        .map(|c| {
            json!({
                "item_id": c.id,
                "name": c.name,
                "price": c.price.to_string(),
                "condition": c.condition,
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::{ItemCondition, ItemId, Price};

    fn summary(id: &str, name: &str) -> ItemSummary {
        ItemSummary {
            id: ItemId::new(id),
            name: name.to_string(),
            price: Price::from_yen(5_000),
            condition: ItemCondition::Good,
            thumbnail_url: None,
            listing_url: format!("https://jp.mercari.com/item/{id}"),
        }
    }

    #[test]
    fn test_candidate_digest_one_line_per_item() {
        let candidates = vec![summary("m1", "カメラ A"), summary("m2", "カメラ B")];
        let digest = candidate_digest(&candidates);
        assert_eq!(digest.lines().count(), 2);
        assert!(digest.contains("\"m1\""));
        assert!(digest.contains("カメラ B"));
    }
}

//! Response generation stage.
//!
//! Asks the model for a free-text recommendation message in the user's own
//! language. The structured product list is assembled here, independently of
//! the narration, so a failed narration still leaves the caller with usable
//! products inside the error.

use serde_json::json;
use tracing::instrument;

use scout_core::{AgentResponse, Recommendation, SearchIntent};

use crate::error::AgentError;
use crate::llm::{LlmChat, LlmError, Message};

const SYSTEM_PROMPT: &str = "You are a shopping assistant presenting second-hand \
    marketplace finds. Write a short, friendly recommendation message in the same \
    language the user wrote their request in. For each product give a concrete reason \
    to buy it, mention the price and condition, and name the seller with their rating \
    when known. Do not invent products or details beyond what you were given.";

/// Generate the final recommendation message.
///
/// # Errors
///
/// Returns [`AgentError::ResponseGeneration`] carrying the enriched products
/// when the narration call fails or yields no text.
#[instrument(skip_all, fields(products = recommendations.len()))]
pub async fn respond(
    llm: &dyn LlmChat,
    utterance: &str,
    intent: &SearchIntent,
    recommendations: Vec<Recommendation>,
) -> Result<AgentResponse, AgentError> {
    let products: Vec<_> = recommendations.iter().map(|r| r.item.clone()).collect();

    let prompt = format!(
        "The user asked:\n{utterance}\n\nInterpreted search: {}\n\nSelected products, \
         best first:\n{}",
        intent.query(),
        product_digest(&recommendations),
    );

    let response = match llm.chat(vec![Message::user(prompt)], Some(SYSTEM_PROMPT.to_string()), None, None).await {
        Ok(response) => response,
        Err(source) => {
            return Err(AgentError::ResponseGeneration { products, source });
        }
    };

    match response.text() {
        Some(message) => Ok(AgentResponse { message, products }),
        None => Err(AgentError::ResponseGeneration {
            products,
            source: LlmError::Parse("narration response carried no text".to_string()),
        }),
    }
}

fn product_digest(recommendations: &[Recommendation]) -> String {
    recommendations
        .iter()
        .map(|r| {
            json!({
                "name": r.item.name,
                "price": r.item.price.to_string(),
                "condition": r.item.condition,
                "description": r.item.description,
                "seller": r.item.seller_name,
                "seller_rating": r.item.seller_rating_display(),
                "shipping": r.item.shipping_display(),
                "url": r.item.listing_url,
                "why_picked": r.reason,
            })
            .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

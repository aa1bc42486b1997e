//! Intent interpretation stage.
//!
//! Turns the user's free-text shopping request into a validated
//! [`SearchIntent`] via a forced call to the `plan_search` tool. A payload
//! that fails validation earns exactly one retry with the violation quoted
//! back to the model.

use tracing::{debug, instrument, warn};

use scout_core::SearchIntent;

use crate::error::AgentError;
use crate::llm::{LlmChat, Message, ToolChoice};
use crate::tools::{INTENT_TOOL, intent_tool, parse_intent_call};

const SYSTEM_PROMPT: &str = "You are a shopping assistant planning a search on Mercari \
    Japan. Read the user's request and call the plan_search tool with the search plan. \
    Keywords must be in Japanese because the marketplace is Japanese; translate generic \
    product terms, but keep proper nouns (brands, character names, game titles) in their \
    original spelling. Set only the filters the user actually asked for.";

const CLARIFY: &str = "Your previous answer could not be used. You MUST call the \
    plan_search tool with at least one non-empty keyword and a consistent price range.";

/// Interpret a shopping request into a structured search intent.
///
/// # Errors
///
/// Returns [`AgentError::IntentParse`] when the model fails to produce a
/// valid `plan_search` call in two attempts, or [`AgentError::Llm`] on
/// transport failure.
#[instrument(skip(llm, utterance))]
pub async fn interpret(llm: &dyn LlmChat, utterance: &str) -> Result<SearchIntent, AgentError> {
    let mut last_err = String::from("no tool call in response");

    for attempt in 1..=2u32 {
        let system = if attempt == 1 {
            SYSTEM_PROMPT.to_string()
        } else {
            format!("{SYSTEM_PROMPT}\n\n{CLARIFY}\nPrevious problem: {last_err}")
        };

        let response = llm
            .chat(
                vec![Message::user(utterance)],
                Some(system),
                Some(vec![intent_tool()]),
                Some(ToolChoice::Tool {
                    name: INTENT_TOOL.to_string(),
                }),
            )
            .await?;

        match response.tool_input(INTENT_TOOL).map(parse_intent_call) {
            Some(Ok(intent)) => {
                debug!(query = %intent.query(), "interpreted intent");
                return Ok(intent);
            }
            Some(Err(err)) => {
                warn!(attempt, %err, "intent payload rejected");
                last_err = err;
            }
            None => {
                warn!(attempt, "response carried no plan_search call");
                last_err = String::from("no plan_search tool call in response");
            }
        }
    }

    Err(AgentError::IntentParse(last_err))
}

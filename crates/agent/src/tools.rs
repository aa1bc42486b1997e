//! Tool schemas and payload validation for the two forced call sites.
//!
//! Tool-call payloads arrive as untyped JSON; each call site has a fixed
//! schema and a pure validator that rejects any payload missing required
//! fields before anything downstream trusts it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use scout_core::{ItemCondition, ItemId, ItemSummary, Price, SearchIntent, SortOrder};

use crate::llm::Tool;

/// Tool name for intent extraction.
pub const INTENT_TOOL: &str = "plan_search";
/// Tool name for top-k selection.
pub const SELECTION_TOOL: &str = "pick_top_items";

/// One ranked pick from the selection call: a candidate id plus a rationale
/// sketch the responder expands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// Id of the picked listing; must come from the candidate set.
    pub item_id: ItemId,
    /// Short rationale for the pick.
    pub reason: String,
}

/// Tool definition for intent extraction.
///
/// The schema enumerates exactly the `SearchIntent` fields. Keywords must be
/// emitted in Japanese (the marketplace's search language) regardless of the
/// input language, except proper nouns, which stay as written.
#[must_use]
pub fn intent_tool() -> Tool {
    Tool {
        name: INTENT_TOOL.to_string(),
        description: "Plan a Mercari Japan search from the user's shopping request. \
            Translate generic product terms into Japanese; keep proper nouns (brands, \
            character names, game titles) in their original spelling. Only set the \
            filters the user explicitly mentioned or clearly implied; leave everything \
            else unset."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Search keyword(s) in Japanese, most important first. Proper nouns keep their original spelling.",
                    "minItems": 1
                },
                "price_min": {
                    "type": "integer",
                    "description": "Minimum price in yen, only if the user stated one"
                },
                "price_max": {
                    "type": "integer",
                    "description": "Maximum price in yen, only if the user stated one"
                },
                "condition": {
                    "type": "string",
                    "enum": ["new", "almost_new", "good", "some_damage", "damaged", "poor"],
                    "description": "Item condition filter, only if the user stated one. Map 'used' to the grade the user implies, defaulting to 'good'."
                },
                "category": {
                    "type": "string",
                    "description": "Product category hint in Japanese, only if clearly implied"
                },
                "sort": {
                    "type": "string",
                    "enum": ["relevance", "price_asc", "price_desc", "newest"],
                    "description": "Result ordering, only if the user asked for one (e.g. 'cheapest')"
                }
            },
            "required": ["keywords"]
        }),
    }
}

/// Tool definition for top-k selection.
#[must_use]
pub fn selection_tool(k: usize) -> Tool {
    Tool {
        name: SELECTION_TOOL.to_string(),
        description: format!(
            "Pick the {k} listings that best match the user's shopping intent, best \
             first. Every item_id must be copied exactly from the candidate list; never \
             invent an id. Give each pick a one-sentence reason (price, condition, \
             popularity, rarity)."
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "picks": {
                    "type": "array",
                    "minItems": k,
                    "maxItems": k,
                    "items": {
                        "type": "object",
                        "properties": {
                            "item_id": {
                                "type": "string",
                                "description": "Listing id copied from the candidate list"
                            },
                            "reason": {
                                "type": "string",
                                "description": "One-sentence reason for this pick"
                            }
                        },
                        "required": ["item_id", "reason"]
                    }
                }
            },
            "required": ["picks"]
        }),
    }
}

#[derive(Debug, Deserialize)]
struct IntentArgs {
    keywords: Vec<String>,
    price_min: Option<u64>,
    price_max: Option<u64>,
    condition: Option<ItemCondition>,
    category: Option<String>,
    sort: Option<SortOrder>,
}

/// Validate an intent tool-call payload into a [`SearchIntent`].
///
/// # Errors
///
/// Returns a description of the violation when required fields are missing,
/// types are wrong, or the intent invariants fail.
pub fn parse_intent_call(input: &Value) -> Result<SearchIntent, String> {
    let args: IntentArgs =
        serde_json::from_value(input.clone()).map_err(|e| format!("malformed payload: {e}"))?;
    SearchIntent::new(
        args.keywords,
        args.price_min.map(Price::from_yen),
        args.price_max.map(Price::from_yen),
        args.condition,
        args.category,
        args.sort.unwrap_or_default(),
    )
    .map_err(|e| e.to_string())
}

#[derive(Debug, Deserialize)]
struct SelectionArgs {
    picks: Vec<Pick>,
}

/// Validate a selection tool-call payload against the candidate set.
///
/// # Errors
///
/// Returns a description of the violation when the payload is malformed,
/// the pick count is not `expected`, ids repeat, or an id is not in the
/// candidate set.
pub fn parse_selection_call(
    input: &Value,
    candidates: &[ItemSummary],
    expected: usize,
) -> Result<Vec<Pick>, String> {
    let args: SelectionArgs =
        serde_json::from_value(input.clone()).map_err(|e| format!("malformed payload: {e}"))?;

    if args.picks.len() != expected {
        return Err(format!(
            "expected exactly {expected} picks, got {}",
            args.picks.len()
        ));
    }

    let known: HashSet<&ItemId> = candidates.iter().map(|c| &c.id).collect();
    let mut seen = HashSet::new();
    for pick in &args.picks {
        if !known.contains(&pick.item_id) {
            return Err(format!("item_id `{}` is not in the candidate set", pick.item_id));
        }
        if !seen.insert(&pick.item_id) {
            return Err(format!("item_id `{}` appears more than once", pick.item_id));
        }
    }

    Ok(args.picks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> ItemSummary {
        ItemSummary {
            id: ItemId::new(id),
            name: format!("item {id}"),
            price: Price::from_yen(1_000),
            condition: ItemCondition::Unknown,
            thumbnail_url: None,
            listing_url: format!("https://jp.mercari.com/item/{id}"),
        }
    }

    #[test]
    fn test_parse_intent_call_full_payload() {
        let input = json!({
            "keywords": ["iPhone"],
            "price_max": 20000,
            "condition": "good"
        });
        let intent = parse_intent_call(&input).expect("valid payload");
        assert_eq!(intent.keywords, vec!["iPhone".to_string()]);
        assert_eq!(intent.price_max, Some(Price::from_yen(20_000)));
        assert_eq!(intent.condition, Some(ItemCondition::Good));
        assert_eq!(intent.sort, SortOrder::Relevance);
        assert!(intent.price_min.is_none());
    }

    #[test]
    fn test_parse_intent_call_missing_keywords() {
        let err = parse_intent_call(&json!({"price_max": 20000})).expect_err("must reject");
        assert!(err.contains("malformed payload"));
    }

    #[test]
    fn test_parse_intent_call_empty_keywords() {
        let err = parse_intent_call(&json!({"keywords": []})).expect_err("must reject");
        assert!(err.contains("keywords"));
    }

    #[test]
    fn test_parse_intent_call_inverted_price_range() {
        let input = json!({
            "keywords": ["カメラ"],
            "price_min": 30000,
            "price_max": 10000
        });
        let err = parse_intent_call(&input).expect_err("must reject");
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn test_parse_selection_call_valid() {
        let candidates = vec![summary("m1"), summary("m2"), summary("m3"), summary("m4")];
        let input = json!({"picks": [
            {"item_id": "m3", "reason": "best price"},
            {"item_id": "m1", "reason": "great condition"},
            {"item_id": "m4", "reason": "popular model"}
        ]});
        let picks = parse_selection_call(&input, &candidates, 3).expect("valid payload");
        assert_eq!(picks.len(), 3);
        // Rank order preserved exactly as returned.
        assert_eq!(picks[0].item_id, ItemId::new("m3"));
        assert_eq!(picks[2].item_id, ItemId::new("m4"));
    }

    #[test]
    fn test_parse_selection_call_unknown_id() {
        let candidates = vec![summary("m1"), summary("m2"), summary("m3")];
        let input = json!({"picks": [
            {"item_id": "m1", "reason": "a"},
            {"item_id": "m2", "reason": "b"},
            {"item_id": "m999", "reason": "fabricated"}
        ]});
        let err = parse_selection_call(&input, &candidates, 3).expect_err("must reject");
        assert!(err.contains("m999"));
    }

    #[test]
    fn test_parse_selection_call_duplicate_id() {
        let candidates = vec![summary("m1"), summary("m2"), summary("m3")];
        let input = json!({"picks": [
            {"item_id": "m1", "reason": "a"},
            {"item_id": "m1", "reason": "again"},
            {"item_id": "m2", "reason": "b"}
        ]});
        let err = parse_selection_call(&input, &candidates, 3).expect_err("must reject");
        assert!(err.contains("more than once"));
    }

    #[test]
    fn test_parse_selection_call_wrong_count() {
        let candidates = vec![summary("m1"), summary("m2"), summary("m3")];
        let input = json!({"picks": [{"item_id": "m1", "reason": "a"}]});
        let err = parse_selection_call(&input, &candidates, 3).expect_err("must reject");
        assert!(err.contains("exactly 3"));
    }

    #[test]
    fn test_tool_schemas_name_required_fields() {
        let intent = intent_tool();
        assert_eq!(intent.name, INTENT_TOOL);
        assert_eq!(intent.input_schema["required"][0], "keywords");

        let selection = selection_tool(3);
        assert_eq!(selection.name, SELECTION_TOOL);
        assert_eq!(selection.input_schema["properties"]["picks"]["minItems"], 3);
    }
}

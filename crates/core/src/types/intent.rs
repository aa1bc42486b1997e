//! Structured search intent.
//!
//! A `SearchIntent` is produced once per request by the intent interpreter
//! and is immutable afterwards; every later stage reads it, none rewrites it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::condition::ItemCondition;
use super::price::Price;

/// Violations of the intent invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    /// A search needs at least one keyword to mean anything.
    #[error("keywords must not be empty")]
    EmptyKeywords,

    /// `price_min` must not exceed `price_max` when both are present.
    #[error("price_min {min} exceeds price_max {max}")]
    InvertedPriceRange {
        /// The offending lower bound.
        min: Price,
        /// The offending upper bound.
        max: Price,
    },
}

/// Requested result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Marketplace relevance score (the default; emits no sort params).
    #[default]
    Relevance,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Most recently listed first.
    Newest,
}

/// What the user wants to buy, extracted from free text.
///
/// `keywords` are already in the marketplace's search language (Japanese),
/// translated by the interpreter; proper nouns are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
    /// Search terms, joined in order to form the query string. Never empty.
    pub keywords: Vec<String>,
    /// Lower price bound, if the user stated one.
    pub price_min: Option<Price>,
    /// Upper price bound, if the user stated one.
    pub price_max: Option<Price>,
    /// Condition filter, if the user stated one.
    pub condition: Option<ItemCondition>,
    /// Category hint, if the user stated one. Folded into the keywords when
    /// the marketplace has no matching filter control.
    pub category: Option<String>,
    /// Result ordering hint.
    pub sort: SortOrder,
}

impl SearchIntent {
    /// Build an intent, enforcing the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::EmptyKeywords`] when `keywords` is empty (after
    /// dropping blank tokens), or [`IntentError::InvertedPriceRange`] when
    /// both bounds are present and inverted.
    pub fn new(
        keywords: Vec<String>,
        price_min: Option<Price>,
        price_max: Option<Price>,
        condition: Option<ItemCondition>,
        category: Option<String>,
        sort: SortOrder,
    ) -> Result<Self, IntentError> {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(IntentError::EmptyKeywords);
        }
        if let (Some(min), Some(max)) = (price_min, price_max)
            && min > max
        {
            return Err(IntentError::InvertedPriceRange { min, max });
        }
        Ok(Self {
            keywords,
            price_min,
            price_max,
            condition,
            category,
            sort,
        })
    }

    /// Keyword-only intent, used by tests and degraded paths.
    ///
    /// # Errors
    ///
    /// Returns [`IntentError::EmptyKeywords`] when `keywords` is empty.
    pub fn from_keywords(keywords: Vec<String>) -> Result<Self, IntentError> {
        Self::new(keywords, None, None, None, None, SortOrder::default())
    }

    /// The joined query string sent to the marketplace.
    #[must_use]
    pub fn query(&self) -> String {
        self.keywords.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_keywords() {
        let err = SearchIntent::from_keywords(vec![]).expect_err("must reject");
        assert_eq!(err, IntentError::EmptyKeywords);
    }

    #[test]
    fn test_new_rejects_blank_keywords() {
        let err =
            SearchIntent::from_keywords(vec!["  ".to_string(), String::new()]).expect_err("must reject");
        assert_eq!(err, IntentError::EmptyKeywords);
    }

    #[test]
    fn test_new_rejects_inverted_price_range() {
        let err = SearchIntent::new(
            vec!["iPhone".to_string()],
            Some(Price::from_yen(30_000)),
            Some(Price::from_yen(20_000)),
            None,
            None,
            SortOrder::default(),
        )
        .expect_err("must reject");
        assert!(matches!(err, IntentError::InvertedPriceRange { .. }));
    }

    #[test]
    fn test_new_accepts_equal_bounds() {
        let intent = SearchIntent::new(
            vec!["iPhone".to_string()],
            Some(Price::from_yen(20_000)),
            Some(Price::from_yen(20_000)),
            None,
            None,
            SortOrder::default(),
        )
        .expect("equal bounds are valid");
        assert_eq!(intent.price_min, intent.price_max);
    }

    #[test]
    fn test_query_joins_keywords_in_order() {
        let intent =
            SearchIntent::from_keywords(vec!["ニンテンドー".to_string(), "スイッチ".to_string()])
                .expect("valid");
        assert_eq!(intent.query(), "ニンテンドー スイッチ");
    }

    #[test]
    fn test_keywords_are_trimmed() {
        let intent = SearchIntent::from_keywords(vec![" iPhone ".to_string()]).expect("valid");
        assert_eq!(intent.keywords, vec!["iPhone".to_string()]);
    }
}

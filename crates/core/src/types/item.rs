//! Listing records and the final response entities.
//!
//! `ItemSummary` is one search-result row; `ItemDetail` is the same listing
//! after a detail fetch. Both are ephemeral: they exist only inside a single
//! request's pipeline. `AgentResponse` is the sole externally observed output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::condition::ItemCondition;
use super::id::ItemId;
use super::price::Price;

/// One row of a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    /// Listing id, unique per listing.
    pub id: ItemId,
    /// Listing title as rendered on the card.
    pub name: String,
    /// Asking price.
    pub price: Price,
    /// Condition grade; `Unknown` when the card does not show one.
    pub condition: ItemCondition,
    /// Card thumbnail image URL.
    pub thumbnail_url: Option<String>,
    /// Absolute URL of the listing's detail page.
    pub listing_url: String,
}

/// A listing at detail-page depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    /// Listing id.
    pub id: ItemId,
    /// Listing title.
    pub name: String,
    /// Asking price.
    pub price: Price,
    /// Condition grade from the detail page.
    pub condition: ItemCondition,
    /// Seller's free-text description.
    pub description: String,
    /// Gallery image URLs, in page order.
    pub images: Vec<String>,
    /// Seller display name.
    pub seller_name: String,
    /// Seller rating out of 5, when the page shows one.
    pub seller_rating: Option<Decimal>,
    /// Shipping arrangement text, when the page shows one.
    pub shipping_info: Option<String>,
    /// Absolute URL of the listing's detail page.
    pub listing_url: String,
}

impl ItemDetail {
    /// Seller rating for display; optional fields render as "unknown"
    /// rather than being treated as fetch failures.
    #[must_use]
    pub fn seller_rating_display(&self) -> String {
        self.seller_rating
            .map_or_else(|| "unknown".to_string(), |r| r.to_string())
    }

    /// Shipping info for display, "unknown" when absent.
    #[must_use]
    pub fn shipping_display(&self) -> &str {
        self.shipping_info.as_deref().unwrap_or("unknown")
    }
}

/// One ranked, explained pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The enriched listing.
    pub item: ItemDetail,
    /// Why this listing was picked, in the user's language.
    pub reason: String,
}

/// The final result of one request.
///
/// `products` is assembled from the enricher's output in rank order and is
/// independent of whatever narrative `message` carries; the structured path
/// and the narrative path never diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// User-facing summary in the user's input language.
    pub message: String,
    /// Up to three enriched listings, best first.
    pub products: Vec<ItemDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_detail() -> ItemDetail {
        ItemDetail {
            id: ItemId::new("m111"),
            name: "Nintendo Switch 本体".to_string(),
            price: Price::from_yen(25_000),
            condition: ItemCondition::Good,
            description: "動作確認済みです。".to_string(),
            images: vec!["https://static.mercdn.net/item/detail/orig/photos/m111_1.jpg".to_string()],
            seller_name: "メルカリユーザーA".to_string(),
            seller_rating: None,
            shipping_info: None,
            listing_url: "https://jp.mercari.com/item/m111".to_string(),
        }
    }

    #[test]
    fn test_optional_fields_render_as_unknown() {
        let detail = sample_detail();
        assert_eq!(detail.seller_rating_display(), "unknown");
        assert_eq!(detail.shipping_display(), "unknown");
    }

    #[test]
    fn test_seller_rating_display_when_present() {
        let detail = ItemDetail {
            seller_rating: Some(Decimal::new(48, 1)),
            ..sample_detail()
        };
        assert_eq!(detail.seller_rating_display(), "4.8");
    }

    #[test]
    fn test_item_summary_round_trips_through_json() {
        let summary = ItemSummary {
            id: ItemId::new("m222"),
            name: "iPhone 13".to_string(),
            price: Price::from_yen(55_000),
            condition: ItemCondition::Unknown,
            thumbnail_url: None,
            listing_url: "https://jp.mercari.com/item/m222".to_string(),
        };
        let json = serde_json::to_string(&summary).expect("serialize");
        let back: ItemSummary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, summary);
    }
}

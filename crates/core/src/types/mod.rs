//! Core type definitions.
//!
//! Submodules group related types:
//! - [`id`] - Listing id newtype
//! - [`price`] - JPY price newtype over decimal arithmetic
//! - [`condition`] - Marketplace condition grades
//! - [`intent`] - Structured search intent and its invariants
//! - [`item`] - Listing records and the final response entities

pub mod condition;
pub mod id;
pub mod intent;
pub mod item;
pub mod price;

pub use condition::ItemCondition;
pub use id::ItemId;
pub use intent::{IntentError, SearchIntent, SortOrder};
pub use item::{AgentResponse, ItemDetail, ItemSummary, Recommendation};
pub use price::Price;

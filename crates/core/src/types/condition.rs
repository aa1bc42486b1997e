//! Marketplace condition grades.
//!
//! Mercari grades every listing on a fixed six-step scale (item condition ids
//! 1-6). Search result cards do not carry the grade, so summaries retrieved
//! from a results page default to [`ItemCondition::Unknown`] until the detail
//! fetch fills it in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Condition grade of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    /// 新品、未使用 (condition id 1)
    New,
    /// 未使用に近い (condition id 2)
    AlmostNew,
    /// 目立った傷や汚れなし (condition id 3)
    Good,
    /// やや傷や汚れあり (condition id 4)
    SomeDamage,
    /// 傷や汚れあり (condition id 5)
    Damaged,
    /// 全体的に状態が悪い (condition id 6)
    Poor,
    /// Not stated on the page that produced this record.
    #[default]
    Unknown,
}

impl ItemCondition {
    /// Map the Japanese condition label shown on a detail page.
    ///
    /// Unrecognized labels become [`Self::Unknown`] rather than failing the
    /// fetch.
    #[must_use]
    pub fn from_mercari_label(label: &str) -> Self {
        match label.trim() {
            "新品、未使用" => Self::New,
            "未使用に近い" => Self::AlmostNew,
            "目立った傷や汚れなし" => Self::Good,
            "やや傷や汚れあり" => Self::SomeDamage,
            "傷や汚れあり" => Self::Damaged,
            "全体的に状態が悪い" => Self::Poor,
            _ => Self::Unknown,
        }
    }

    /// The marketplace's numeric condition id used in search filter params.
    ///
    /// Returns `None` for [`Self::Unknown`], which cannot be filtered on.
    #[must_use]
    pub const fn mercari_id(&self) -> Option<u8> {
        match self {
            Self::New => Some(1),
            Self::AlmostNew => Some(2),
            Self::Good => Some(3),
            Self::SomeDamage => Some(4),
            Self::Damaged => Some(5),
            Self::Poor => Some(6),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::New => "new, unused",
            Self::AlmostNew => "almost new",
            Self::Good => "good (no noticeable damage)",
            Self::SomeDamage => "some scratches or stains",
            Self::Damaged => "scratched or stained",
            Self::Poor => "poor overall condition",
            Self::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

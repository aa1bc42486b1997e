//! Type-safe price representation using decimal arithmetic.
//!
//! The marketplace lists every item in Japanese yen, so `Price` is a
//! single-currency newtype; a `currency` field would carry no information
//! here.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A listing price in JPY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal yen amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole yen amount.
    #[must_use]
    pub fn from_yen(yen: u64) -> Self {
        Self(Decimal::from(yen))
    }

    /// The decimal yen amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a scraped price label such as `¥12,345` or `12345円`.
    ///
    /// Keeps only the ASCII digits, so thousands separators and currency
    /// markers in either position are tolerated. Returns `None` when the
    /// label contains no digits.
    #[must_use]
    pub fn parse_jpy(label: &str) -> Option<Self> {
        let digits: String = label.chars().filter(char::is_ascii_digit).collect();
        digits.parse::<u64>().ok().map(Self::from_yen)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "¥{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jpy_with_symbol_and_separator() {
        let price = Price::parse_jpy("¥12,345").expect("parse");
        assert_eq!(price, Price::from_yen(12_345));
    }

    #[test]
    fn test_parse_jpy_suffix_style() {
        let price = Price::parse_jpy("25000円").expect("parse");
        assert_eq!(price, Price::from_yen(25_000));
    }

    #[test]
    fn test_parse_jpy_no_digits() {
        assert!(Price::parse_jpy("SOLD").is_none());
        assert!(Price::parse_jpy("").is_none());
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_yen(1_000) < Price::from_yen(20_000));
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_yen(19_800).to_string(), "¥19800");
    }
}

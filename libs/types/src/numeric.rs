//! Money and share-count types
//!
//! Prices use rust_decimal for deterministic arithmetic (no floating-point
//! errors); share counts are whole units. Split ratios carry the integer
//! rescaling rules applied by corporate actions.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// A strictly positive per-share price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price
    ///
    /// # Panics
    /// Panics if the value is not strictly positive
    pub fn new(value: Decimal) -> Self {
        assert!(value > Decimal::ZERO, "Price must be positive");
        Self(value)
    }

    /// Try to create a Price, returning None unless the value is positive
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create from a whole-number price
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Parse from a decimal string, returning None if unparseable or non-positive
    pub fn from_str(s: &str) -> Option<Self> {
        s.parse::<Decimal>().ok().and_then(Self::try_new)
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Total cash value of `shares` at this price
    pub fn notional(&self, shares: Shares) -> Decimal {
        self.0 * Decimal::from(shares.get())
    }

    /// Number of whole shares affordable with `cash` at this price
    pub fn affordable_shares(&self, cash: Decimal) -> Shares {
        if cash <= Decimal::ZERO {
            return Shares::ZERO;
        }
        let count = (cash / self.0).floor().to_u64().unwrap_or(u64::MAX);
        Shares::new(count)
    }

    /// Check whether this price lies within `band` (a fraction, e.g. 0.10)
    /// of the reference price, inclusive on both bounds
    pub fn within_band(&self, reference: Price, band: Decimal) -> bool {
        let low = reference.0 * (Decimal::ONE - band);
        let high = reference.0 * (Decimal::ONE + band);
        self.0 >= low && self.0 <= high
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A whole-share quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Shares(u64);

impl Shares {
    pub const ZERO: Shares = Shares(0);

    /// Create a new share count
    pub fn new(count: u64) -> Self {
        Self(count)
    }

    /// Get the inner count
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Check if the count is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtract, returning None on underflow
    pub fn checked_sub(&self, other: Shares) -> Option<Shares> {
        self.0.checked_sub(other.0).map(Shares)
    }

    /// Subtract, clamping at zero
    pub fn saturating_sub(&self, other: Shares) -> Shares {
        Shares(self.0.saturating_sub(other.0))
    }
}

impl Add for Shares {
    type Output = Shares;

    fn add(self, rhs: Shares) -> Shares {
        Shares(self.0 + rhs.0)
    }
}

impl AddAssign for Shares {
    fn add_assign(&mut self, rhs: Shares) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stock split ratio `numerator:denominator` (new shares per old).
///
/// A regular split has `numerator > denominator` (e.g. 2:1); a reverse
/// split has `numerator < denominator` (e.g. 1:2). Share counts scale by
/// `numerator/denominator` with integer floor; prices scale by the inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitRatio {
    pub numerator: u64,
    pub denominator: u64,
}

impl SplitRatio {
    /// Create a new ratio
    ///
    /// # Panics
    /// Panics if either side is zero
    pub fn new(numerator: u64, denominator: u64) -> Self {
        assert!(
            numerator > 0 && denominator > 0,
            "Split ratio sides must be positive"
        );
        Self {
            numerator,
            denominator,
        }
    }

    /// Try to create a ratio, returning None if either side is zero
    pub fn try_new(numerator: u64, denominator: u64) -> Option<Self> {
        if numerator > 0 && denominator > 0 {
            Some(Self {
                numerator,
                denominator,
            })
        } else {
            None
        }
    }

    /// True for reverse splits (share count shrinks)
    pub fn is_reverse(&self) -> bool {
        self.numerator < self.denominator
    }

    /// Rescale a share count: `floor(count * numerator / denominator)`
    pub fn apply_to_shares(&self, shares: Shares) -> Shares {
        let scaled = shares.get() as u128 * self.numerator as u128 / self.denominator as u128;
        Shares::new(u64::try_from(scaled).unwrap_or(u64::MAX))
    }

    /// Rescale a price by the inverse ratio: `price * denominator / numerator`
    pub fn apply_to_price(&self, price: Price) -> Price {
        Price::new(
            price.as_decimal() * Decimal::from(self.denominator) / Decimal::from(self.numerator),
        )
    }

    /// The inverse ratio (undoes this split up to integer flooring)
    pub fn inverse(&self) -> SplitRatio {
        SplitRatio {
            numerator: self.denominator,
            denominator: self.numerator,
        }
    }
}

impl fmt::Display for SplitRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_creation() {
        let price = Price::from_u64(120);
        assert_eq!(price.as_decimal(), Decimal::from(120));
    }

    #[test]
    #[should_panic(expected = "Price must be positive")]
    fn test_price_zero_panics() {
        Price::new(Decimal::ZERO);
    }

    #[test]
    fn test_price_try_new() {
        assert!(Price::try_new(Decimal::from(50)).is_some());
        assert!(Price::try_new(Decimal::ZERO).is_none());
        assert!(Price::try_new(Decimal::from(-1)).is_none());
    }

    #[test]
    fn test_price_from_str() {
        let price = Price::from_str("3000.50").unwrap();
        assert_eq!(price.as_decimal(), "3000.50".parse::<Decimal>().unwrap());
        assert!(Price::from_str("-5").is_none());
        assert!(Price::from_str("garbage").is_none());
    }

    #[test]
    fn test_price_notional() {
        let price = Price::from_u64(120);
        assert_eq!(price.notional(Shares::new(83)), Decimal::from(9960));
    }

    #[test]
    fn test_affordable_shares_floors() {
        let price = Price::from_u64(120);
        // 10_000 / 120 = 83.33 -> 83 whole shares
        assert_eq!(price.affordable_shares(Decimal::from(10_000)).get(), 83);
        assert_eq!(price.affordable_shares(Decimal::from(119)).get(), 0);
        assert_eq!(price.affordable_shares(Decimal::ZERO).get(), 0);
        assert_eq!(price.affordable_shares(Decimal::from(-50)).get(), 0);
    }

    #[test]
    fn test_price_band() {
        let reference = Price::from_u64(100);
        let band = "0.10".parse::<Decimal>().unwrap();

        assert!(Price::from_u64(100).within_band(reference, band));
        assert!(Price::from_u64(110).within_band(reference, band));
        assert!(Price::from_u64(90).within_band(reference, band));
        assert!(!Price::from_u64(111).within_band(reference, band));
        assert!(!Price::from_u64(89).within_band(reference, band));
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_u64(100) < Price::from_u64(120));
        assert_eq!(
            Price::from_str("100.0").unwrap(),
            Price::from_u64(100),
            "trailing zeros do not affect equality"
        );
    }

    #[test]
    fn test_shares_arithmetic() {
        let a = Shares::new(100);
        let b = Shares::new(17);

        assert_eq!(a + b, Shares::new(117));
        assert_eq!(a.checked_sub(b), Some(Shares::new(83)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(b.saturating_sub(a), Shares::ZERO);
        assert!(Shares::ZERO.is_zero());
    }

    #[test]
    fn test_split_ratio_shares_floor() {
        let split = SplitRatio::new(2, 1);
        assert_eq!(split.apply_to_shares(Shares::new(100)), Shares::new(200));

        let reverse = SplitRatio::new(1, 3);
        // floor(100 / 3) = 33
        assert_eq!(reverse.apply_to_shares(Shares::new(100)), Shares::new(33));
        assert!(reverse.is_reverse());
    }

    #[test]
    fn test_split_ratio_price_inverse_scaling() {
        let split = SplitRatio::new(2, 1);
        assert_eq!(
            split.apply_to_price(Price::from_u64(120)),
            Price::from_u64(60)
        );

        let reverse = SplitRatio::new(1, 2);
        assert_eq!(
            reverse.apply_to_price(Price::from_u64(60)),
            Price::from_u64(120)
        );
    }

    #[test]
    fn test_split_ratio_inverse_round_trip() {
        let split = SplitRatio::new(2, 1);
        let there = split.apply_to_shares(Shares::new(250));
        let back = split.inverse().apply_to_shares(there);
        assert_eq!(back, Shares::new(250));
    }

    #[test]
    #[should_panic(expected = "Split ratio sides must be positive")]
    fn test_split_ratio_zero_panics() {
        SplitRatio::new(0, 1);
    }

    #[test]
    fn test_price_serialization() {
        let price = Price::from_str("99.95").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }
}

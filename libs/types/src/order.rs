//! Order lifecycle types
//!
//! An order is admitted into a company's book, loses remaining shares to
//! fills, and is removed once fully filled, cancelled, or swept.

use crate::errors::AdmissionError;
use crate::ids::{CompanyId, OrderId, ShareholderId};
use crate::numeric::{Price, Shares};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// Order pricing: a limit bound or execution at market.
///
/// The tagged form makes "a limit order without a price" unrepresentable;
/// there is no optional price field to null-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "limit", rename_all = "UPPERCASE")]
pub enum OrderPrice {
    /// Execute only at this price or better
    Limit(Price),
    /// Execute against the best available opposing limit orders
    Market,
}

impl OrderPrice {
    /// Build a limit pricing from a raw decimal, rejecting non-positive values
    pub fn try_limit(value: Decimal) -> Result<Self, AdmissionError> {
        Price::try_new(value)
            .map(OrderPrice::Limit)
            .ok_or(AdmissionError::InvalidLimitPrice { price: value })
    }

    /// The limit price, if any
    pub fn limit(&self) -> Option<Price> {
        match self {
            OrderPrice::Limit(price) => Some(*price),
            OrderPrice::Market => None,
        }
    }

    /// Check if this is market pricing
    pub fn is_market(&self) -> bool {
        matches!(self, OrderPrice::Market)
    }

    /// Check if this is limit pricing
    pub fn is_limit(&self) -> bool {
        matches!(self, OrderPrice::Limit(_))
    }

    /// Price used for display ordering: the limit price, or `fallback`
    /// (the current stock price) for market orders
    pub fn effective(&self, fallback: Price) -> Price {
        match self {
            OrderPrice::Limit(price) => *price,
            OrderPrice::Market => fallback,
        }
    }
}

/// An open order resting in a company's book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub shareholder_id: ShareholderId,
    pub company_id: CompanyId,
    pub side: Side,
    pub pricing: OrderPrice,
    pub remaining: Shares,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new open order with full remaining quantity
    pub fn new(
        shareholder_id: ShareholderId,
        company_id: CompanyId,
        side: Side,
        pricing: OrderPrice,
        shares: Shares,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: OrderId::new(),
            shareholder_id,
            company_id,
            side,
            pricing,
            remaining: shares,
            created_at,
        }
    }

    /// Decrement remaining shares after a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn fill(&mut self, quantity: Shares) {
        assert!(
            quantity <= self.remaining,
            "Fill would exceed remaining quantity"
        );
        self.remaining = self.remaining.saturating_sub(quantity);
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.remaining.is_zero()
    }

    /// The limit price, if any
    pub fn limit_price(&self) -> Option<Price> {
        self.pricing.limit()
    }

    /// Price used for display ordering (market orders fall back to `fallback`)
    pub fn effective_price(&self, fallback: Price) -> Price {
        self.pricing.effective(fallback)
    }

    /// Cash committed by this order at its limit price, None for market orders
    pub fn notional(&self) -> Option<Decimal> {
        self.limit_price().map(|price| price.notional(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_order(side: Side, pricing: OrderPrice, shares: u64) -> Order {
        Order::new(
            ShareholderId::new(),
            CompanyId::new(),
            side,
            pricing,
            Shares::new(shares),
            Utc::now(),
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_try_limit_rejects_non_positive() {
        assert!(OrderPrice::try_limit(Decimal::from(55)).is_ok());
        assert!(matches!(
            OrderPrice::try_limit(Decimal::ZERO),
            Err(AdmissionError::InvalidLimitPrice { .. })
        ));
        assert!(OrderPrice::try_limit(Decimal::from(-3)).is_err());
    }

    #[test]
    fn test_order_price_helpers() {
        let limit = OrderPrice::Limit(Price::from_u64(120));
        assert!(limit.is_limit());
        assert_eq!(limit.limit(), Some(Price::from_u64(120)));
        assert_eq!(limit.effective(Price::from_u64(99)), Price::from_u64(120));

        let market = OrderPrice::Market;
        assert!(market.is_market());
        assert_eq!(market.limit(), None);
        assert_eq!(market.effective(Price::from_u64(99)), Price::from_u64(99));
    }

    #[test]
    fn test_order_creation_and_fill() {
        let mut order = make_order(Side::SELL, OrderPrice::Limit(Price::from_u64(120)), 100);
        assert!(!order.is_filled());

        order.fill(Shares::new(83));
        assert_eq!(order.remaining, Shares::new(17));
        assert!(!order.is_filled());

        order.fill(Shares::new(17));
        assert!(order.is_filled());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed remaining quantity")]
    fn test_overfill_panics() {
        let mut order = make_order(Side::BUY, OrderPrice::Market, 10);
        order.fill(Shares::new(11));
    }

    #[test]
    fn test_order_notional() {
        let limit = make_order(Side::BUY, OrderPrice::Limit(Price::from_u64(55)), 10);
        assert_eq!(limit.notional(), Some(Decimal::from(550)));

        let market = make_order(Side::BUY, OrderPrice::Market, 10);
        assert_eq!(market.notional(), None);
    }

    #[test]
    fn test_order_serialization() {
        let order = make_order(Side::SELL, OrderPrice::Limit(Price::from_u64(120)), 100);
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(order.order_id, deserialized.order_id);
        assert_eq!(order.pricing, deserialized.pricing);
        assert_eq!(order.remaining, deserialized.remaining);
    }

    #[test]
    fn test_market_pricing_serialization() {
        let json = serde_json::to_string(&OrderPrice::Market).unwrap();
        assert_eq!(json, "{\"kind\":\"MARKET\"}");

        let back: OrderPrice = serde_json::from_str(&json).unwrap();
        assert!(back.is_market());
    }
}

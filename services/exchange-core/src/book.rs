//! Per-company order book
//!
//! Limit orders rest in price levels with a FIFO queue per level; market
//! orders rest in side-specific FIFO queues. Orders are removed the moment
//! their remaining quantity reaches zero, so everything in the book is live.

use std::collections::{BTreeMap, VecDeque};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{OrderId, ShareholderId};
use types::numeric::{Price, Shares, SplitRatio};
use types::order::{Order, OrderPrice, Side};

/// Sorted snapshot of a company's open orders.
///
/// Market orders are slotted by their effective price (the company's
/// current stock price); ties preserve price-time priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookView {
    /// Buy orders, best (highest effective price) first
    pub buy: Vec<Order>,
    /// Sell orders, best (lowest effective price) first
    pub sell: Vec<Order>,
}

/// Resting orders for a single company.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, Order>,
    bids: BTreeMap<Price, VecDeque<OrderId>>,
    asks: BTreeMap<Price, VecDeque<OrderId>>,
    market_bids: VecDeque<OrderId>,
    market_asks: VecDeque<OrderId>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, order: Order) {
        match (order.side, order.pricing) {
            (Side::BUY, OrderPrice::Limit(price)) => {
                self.bids.entry(price).or_default().push_back(order.order_id);
            }
            (Side::SELL, OrderPrice::Limit(price)) => {
                self.asks.entry(price).or_default().push_back(order.order_id);
            }
            (Side::BUY, OrderPrice::Market) => self.market_bids.push_back(order.order_id),
            (Side::SELL, OrderPrice::Market) => self.market_asks.push_back(order.order_id),
        }
        self.orders.insert(order.order_id, order);
    }

    pub(crate) fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let order = self.orders.remove(order_id)?;
        match (order.side, order.pricing) {
            (Side::BUY, OrderPrice::Limit(price)) => {
                Self::remove_from_level(&mut self.bids, price, order_id);
            }
            (Side::SELL, OrderPrice::Limit(price)) => {
                Self::remove_from_level(&mut self.asks, price, order_id);
            }
            (Side::BUY, OrderPrice::Market) => self.market_bids.retain(|id| id != order_id),
            (Side::SELL, OrderPrice::Market) => self.market_asks.retain(|id| id != order_id),
        }
        Some(order)
    }

    fn remove_from_level(
        levels: &mut BTreeMap<Price, VecDeque<OrderId>>,
        price: Price,
        order_id: &OrderId,
    ) {
        if let Some(queue) = levels.get_mut(&price) {
            queue.retain(|id| id != order_id);
            if queue.is_empty() {
                levels.remove(&price);
            }
        }
    }

    /// Decrement an order's remaining quantity, removing it once empty.
    /// Returns the quantity still resting after the fill.
    pub(crate) fn fill(&mut self, order_id: &OrderId, quantity: Shares) -> Shares {
        let Some(order) = self.orders.get_mut(order_id) else {
            return Shares::ZERO;
        };
        order.fill(quantity);
        let remaining = order.remaining;
        if remaining.is_zero() {
            self.remove(order_id);
        }
        remaining
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.orders.contains_key(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Lowest open limit sell price, if any.
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Highest open limit buy price, if any.
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    /// Limit buy ids, highest price first, FIFO within a level.
    pub(crate) fn limit_buy_ids(&self) -> Vec<OrderId> {
        self.bids
            .iter()
            .rev()
            .flat_map(|(_, queue)| queue.iter().copied())
            .collect()
    }

    /// Limit sell ids, lowest price first, FIFO within a level.
    pub(crate) fn limit_sell_ids(&self) -> Vec<OrderId> {
        self.asks
            .iter()
            .flat_map(|(_, queue)| queue.iter().copied())
            .collect()
    }

    /// Limit sell ids whose price lies within `band` of `reference`,
    /// lowest price first.
    pub(crate) fn limit_sell_ids_in_band(&self, reference: Price, band: Decimal) -> Vec<OrderId> {
        self.asks
            .iter()
            .filter(|(price, _)| price.within_band(reference, band))
            .flat_map(|(_, queue)| queue.iter().copied())
            .collect()
    }

    /// Limit buy ids whose price lies within `band` of `reference`,
    /// highest price first.
    pub(crate) fn limit_buy_ids_in_band(&self, reference: Price, band: Decimal) -> Vec<OrderId> {
        self.bids
            .iter()
            .rev()
            .filter(|(price, _)| price.within_band(reference, band))
            .flat_map(|(_, queue)| queue.iter().copied())
            .collect()
    }

    /// Whether any limit order on `side` rests within the band.
    pub(crate) fn has_limit_in_band(&self, side: Side, reference: Price, band: Decimal) -> bool {
        let levels = match side {
            Side::BUY => &self.bids,
            Side::SELL => &self.asks,
        };
        levels.keys().any(|price| price.within_band(reference, band))
    }

    pub(crate) fn market_buy_ids(&self) -> Vec<OrderId> {
        self.market_bids.iter().copied().collect()
    }

    pub(crate) fn market_sell_ids(&self) -> Vec<OrderId> {
        self.market_asks.iter().copied().collect()
    }

    /// Total shares across a shareholder's open buy orders.
    pub fn open_buy_shares(&self, shareholder_id: &ShareholderId) -> Shares {
        self.orders
            .values()
            .filter(|order| order.shareholder_id == *shareholder_id && order.side == Side::BUY)
            .fold(Shares::ZERO, |total, order| total + order.remaining)
    }

    /// Total shares across a shareholder's open sell orders.
    pub fn open_sell_shares(&self, shareholder_id: &ShareholderId) -> Shares {
        self.orders
            .values()
            .filter(|order| order.shareholder_id == *shareholder_id && order.side == Side::SELL)
            .fold(Shares::ZERO, |total, order| total + order.remaining)
    }

    /// Cash committed by a shareholder's open limit buy orders.
    pub fn limit_buy_commitment(&self, shareholder_id: &ShareholderId) -> Decimal {
        self.orders
            .values()
            .filter(|order| order.shareholder_id == *shareholder_id && order.side == Side::BUY)
            .filter_map(|order| order.notional())
            .sum()
    }

    pub fn orders_of(&self, shareholder_id: &ShareholderId) -> Vec<Order> {
        self.orders
            .values()
            .filter(|order| order.shareholder_id == *shareholder_id)
            .cloned()
            .collect()
    }

    /// Rescale every resting order for a stock split: quantities floored
    /// by the ratio, limit prices adjusted inversely, queue positions kept.
    /// Returns the ids of orders dropped because they rounded to zero.
    pub(crate) fn rescale(&mut self, ratio: &SplitRatio) -> Vec<OrderId> {
        let order_ids: Vec<OrderId> = self
            .limit_buy_ids()
            .into_iter()
            .chain(self.limit_sell_ids())
            .chain(self.market_buy_ids())
            .chain(self.market_sell_ids())
            .collect();
        let mut removed = Vec::new();
        let mut rescaled = Vec::with_capacity(order_ids.len());
        for order_id in order_ids {
            let Some(mut order) = self.remove(&order_id) else {
                continue;
            };
            order.remaining = ratio.apply_to_shares(order.remaining);
            if let OrderPrice::Limit(price) = order.pricing {
                order.pricing = OrderPrice::Limit(ratio.apply_to_price(price));
            }
            if order.remaining.is_zero() {
                removed.push(order_id);
            } else {
                rescaled.push(order);
            }
        }
        // reinsertion in collection order preserves price-time priority
        for order in rescaled {
            self.insert(order);
        }
        removed
    }

    /// Snapshot both sides sorted by effective price, market orders
    /// valued at `fallback`.
    pub fn view(&self, fallback: Price) -> BookView {
        let mut buy: Vec<Order> = self
            .limit_buy_ids()
            .into_iter()
            .chain(self.market_buy_ids())
            .filter_map(|id| self.orders.get(&id).cloned())
            .collect();
        let mut sell: Vec<Order> = self
            .limit_sell_ids()
            .into_iter()
            .chain(self.market_sell_ids())
            .filter_map(|id| self.orders.get(&id).cloned())
            .collect();
        // stable sort keeps FIFO order among equal effective prices
        buy.sort_by(|a, b| b.effective_price(fallback).cmp(&a.effective_price(fallback)));
        sell.sort_by(|a, b| a.effective_price(fallback).cmp(&b.effective_price(fallback)));
        BookView { buy, sell }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use types::ids::CompanyId;

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

    fn limit(value: u64) -> OrderPrice {
        OrderPrice::Limit(Price::from_u64(value))
    }

    #[test]
    fn test_insert_and_remove_round_trip() {
        let mut book = OrderBook::new();
        let order = make_order(Side::BUY, limit(100), 10);
        let order_id = order.order_id;
        book.insert(order);
        assert!(book.contains(&order_id));
        assert_eq!(book.len(), 1);

        let removed = book.remove(&order_id).unwrap();
        assert_eq!(removed.order_id, order_id);
        assert!(book.is_empty());
        assert_eq!(book.best_bid_price(), None);
    }

    #[test]
    fn test_fill_removes_exhausted_orders() {
        let mut book = OrderBook::new();
        let order = make_order(Side::SELL, limit(50), 10);
        let order_id = order.order_id;
        book.insert(order);

        assert_eq!(book.fill(&order_id, Shares::new(4)), Shares::new(6));
        assert!(book.contains(&order_id));
        assert_eq!(book.fill(&order_id, Shares::new(6)), Shares::ZERO);
        assert!(!book.contains(&order_id));
        assert_eq!(book.best_ask_price(), None);
    }

    #[test]
    fn test_limit_sells_sorted_ascending_fifo_within_level() {
        let mut book = OrderBook::new();
        let first_at_90 = make_order(Side::SELL, limit(90), 5);
        let second_at_90 = make_order(Side::SELL, limit(90), 5);
        let at_80 = make_order(Side::SELL, limit(80), 5);
        let ids = [first_at_90.order_id, second_at_90.order_id, at_80.order_id];
        book.insert(first_at_90);
        book.insert(second_at_90);
        book.insert(at_80);

        assert_eq!(book.limit_sell_ids(), vec![ids[2], ids[0], ids[1]]);
        assert_eq!(book.best_ask_price(), Some(Price::from_u64(80)));
    }

    #[test]
    fn test_limit_buys_sorted_descending() {
        let mut book = OrderBook::new();
        let low = make_order(Side::BUY, limit(95), 5);
        let high = make_order(Side::BUY, limit(105), 5);
        let ids = [low.order_id, high.order_id];
        book.insert(low);
        book.insert(high);

        assert_eq!(book.limit_buy_ids(), vec![ids[1], ids[0]]);
        assert_eq!(book.best_bid_price(), Some(Price::from_u64(105)));
    }

    #[test]
    fn test_band_filter_excludes_out_of_range_levels() {
        let mut book = OrderBook::new();
        let in_band = make_order(Side::SELL, limit(108), 5);
        let out_of_band = make_order(Side::SELL, limit(111), 5);
        let in_band_id = in_band.order_id;
        book.insert(in_band);
        book.insert(out_of_band);

        let reference = Price::from_u64(100);
        let band = Decimal::new(1, 1);
        assert_eq!(book.limit_sell_ids_in_band(reference, band), vec![in_band_id]);
        assert!(book.has_limit_in_band(Side::SELL, reference, band));
        assert!(!book.has_limit_in_band(Side::BUY, reference, band));
    }

    #[test]
    fn test_commitment_counts_only_limit_buys() {
        let mut book = OrderBook::new();
        let shareholder_id = ShareholderId::new();
        let company_id = CompanyId::new();
        let now = Utc::now();
        book.insert(Order::new(
            shareholder_id,
            company_id,
            Side::BUY,
            limit(100),
            Shares::new(3),
            now,
        ));
        book.insert(Order::new(
            shareholder_id,
            company_id,
            Side::BUY,
            OrderPrice::Market,
            Shares::new(50),
            now,
        ));
        book.insert(Order::new(
            shareholder_id,
            company_id,
            Side::SELL,
            limit(200),
            Shares::new(7),
            now,
        ));

        assert_eq!(book.limit_buy_commitment(&shareholder_id), Decimal::from(300));
        assert_eq!(book.open_buy_shares(&shareholder_id), Shares::new(53));
        assert_eq!(book.open_sell_shares(&shareholder_id), Shares::new(7));
    }

    #[test]
    fn test_rescale_floors_quantities_and_adjusts_prices() {
        let mut book = OrderBook::new();
        let sell = make_order(Side::SELL, limit(120), 17);
        let tiny = make_order(Side::SELL, limit(120), 1);
        let sell_id = sell.order_id;
        let tiny_id = tiny.order_id;
        book.insert(sell);
        book.insert(tiny);

        // 1:2 reverse split: quantities halve (floored), prices double
        let removed = book.rescale(&SplitRatio::new(1, 2));
        assert_eq!(removed, vec![tiny_id]);
        let survivor = book.get(&sell_id).unwrap();
        assert_eq!(survivor.remaining, Shares::new(8));
        assert_eq!(survivor.limit_price(), Some(Price::from_u64(240)));
        assert!(!book.contains(&tiny_id));
    }

    #[test]
    fn test_view_slots_market_orders_at_fallback_price() {
        let mut book = OrderBook::new();
        book.insert(make_order(Side::BUY, limit(110), 1));
        book.insert(make_order(Side::BUY, OrderPrice::Market, 2));
        book.insert(make_order(Side::BUY, limit(90), 3));

        let view = book.view(Price::from_u64(100));
        let quantities: Vec<u64> = view.buy.iter().map(|o| o.remaining.get()).collect();
        assert_eq!(quantities, vec![1, 2, 3]);
        assert!(view.sell.is_empty());
    }
}

//! Market-order execution
//!
//! A market order walks the opposing limit orders whose prices lie within
//! the band around the pass reference, best price first. Each candidate
//! fill is capped by what the buyer can pay (or the seller holds) at that
//! candidate's price; a zero cap skips the candidate rather than failing
//! the order. Market orders left with no in-band counterparty at pass end
//! are swept from the book.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use types::ids::OrderId;
use types::numeric::{Price, Shares};
use types::order::Side;

use super::PassStats;
use crate::book::OrderBook;
use crate::config::EngineConfig;
use crate::ledger;
use crate::store::MarketStore;

pub(super) fn execute_market_orders(
    store: &mut MarketStore,
    config: &EngineConfig,
    book: &mut OrderBook,
    side: Side,
    reference: Price,
    now: DateTime<Utc>,
    stats: &mut PassStats,
) {
    let order_ids = match side {
        Side::BUY => book.market_buy_ids(),
        Side::SELL => book.market_sell_ids(),
    };
    for order_id in order_ids {
        execute_one(store, config, book, &order_id, reference, now, stats);
    }
}

fn execute_one(
    store: &mut MarketStore,
    config: &EngineConfig,
    book: &mut OrderBook,
    order_id: &OrderId,
    reference: Price,
    now: DateTime<Utc>,
    stats: &mut PassStats,
) {
    let candidates = {
        let Some(order) = book.get(order_id) else {
            return;
        };
        match order.side {
            Side::BUY => book.limit_sell_ids_in_band(reference, config.price_band_pct),
            Side::SELL => book.limit_buy_ids_in_band(reference, config.price_band_pct),
        }
    };

    for candidate_id in candidates {
        let Some(order) = book.get(order_id) else {
            return; // fully filled
        };
        let Some(candidate) = book.get(&candidate_id) else {
            continue;
        };
        let Some(price) = candidate.limit_price() else {
            continue;
        };
        let side = order.side;
        let owner = order.shareholder_id;
        let company_id = order.company_id;
        let counterparty = candidate.shareholder_id;

        let mut quantity = order.remaining.min(candidate.remaining);
        quantity = match side {
            Side::BUY => {
                let cash = store
                    .shareholder(&owner)
                    .map(|s| s.cash)
                    .unwrap_or(Decimal::ZERO);
                quantity.min(price.affordable_shares(cash))
            }
            Side::SELL => quantity.min(store.holding(&owner, &company_id)),
        };
        if quantity.is_zero() {
            // nothing executable at this level; a cheaper or dearer
            // candidate may still fit
            continue;
        }

        let (buyer_id, seller_id) = match side {
            Side::BUY => (owner, counterparty),
            Side::SELL => (counterparty, owner),
        };
        match ledger::settle(store, buyer_id, seller_id, company_id, quantity, price, now) {
            Ok(transaction) => {
                book.fill(order_id, quantity);
                book.fill(&candidate_id, quantity);
                stats.record(quantity, transaction.notional());
            }
            Err(error) => {
                warn!(
                    order_id = %order_id,
                    candidate_id = %candidate_id,
                    %error,
                    "fill refused by ledger, skipping"
                );
            }
        }
    }
}

/// Remove market orders with no opposing limit order inside the band.
pub(super) fn sweep_orphans(book: &mut OrderBook, reference: Price, band: Decimal) -> Vec<OrderId> {
    let mut swept = Vec::new();
    if !book.has_limit_in_band(Side::SELL, reference, band) {
        for order_id in book.market_buy_ids() {
            book.remove(&order_id);
            swept.push(order_id);
        }
    }
    if !book.has_limit_in_band(Side::BUY, reference, band) {
        for order_id in book.market_sell_ids() {
            book.remove(&order_id);
            swept.push(order_id);
        }
    }
    for order_id in &swept {
        warn!(order_id = %order_id, "market order swept: no counterparty within price band");
    }
    swept
}

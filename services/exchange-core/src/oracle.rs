//! Price discovery
//!
//! The quoted stock price follows the book: the lowest open limit sell
//! wins, then the most recent trade, and with neither signal the price
//! stays where it was. Refresh runs after every matching pass and after
//! any corporate action that can move the price.

use tracing::debug;
use types::ids::CompanyId;
use types::numeric::Price;

use crate::store::MarketStore;

/// Reference price for band checks: the most recent trade, falling back
/// to the current stock price. Snapshotted once per matching pass.
pub(crate) fn reference_price(store: &MarketStore, company_id: &CompanyId) -> Option<Price> {
    store
        .last_trade_price(company_id)
        .or_else(|| store.company(company_id).map(|c| c.stock_price))
}

/// Recompute and store the company's quoted price.
pub(crate) fn refresh(store: &mut MarketStore, company_id: &CompanyId) {
    let best_ask = store.book(company_id).and_then(|book| book.best_ask_price());
    let next = best_ask.or_else(|| store.last_trade_price(company_id));
    let Some(price) = next else {
        return;
    };
    if let Some(company) = store.company_mut(company_id) {
        if company.stock_price != price {
            debug!(company_id = %company_id, price = %price, "stock price updated");
            company.stock_price = price;
        }
    }
}

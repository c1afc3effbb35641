//! Matching pass
//!
//! One pass per company runs four phases in fixed order: market buys,
//! market sells, limit crossing, then an orphan sweep, followed by a
//! price refresh. The band reference is snapshotted once at pass start,
//! so every phase of a pass judges prices against the same anchor.
//!
//! The book is detached from the store for the duration of the pass so
//! settlement can mutate balances while the pass walks resting orders.

mod crossing;
mod market;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use types::errors::EngineError;
use types::ids::CompanyId;
use types::numeric::{Price, Shares};
use types::order::Side;

use crate::config::EngineConfig;
use crate::oracle;
use crate::store::MarketStore;

/// Outcome of one matching pass over one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub company_id: CompanyId,
    pub trades_executed: usize,
    pub shares_traded: Shares,
    pub notional_traded: Decimal,
    pub orders_swept: usize,
    /// Quoted stock price after the closing refresh
    pub closing_price: Price,
}

#[derive(Debug, Default)]
pub(crate) struct PassStats {
    trades: usize,
    shares: u64,
    notional: Decimal,
}

impl PassStats {
    pub(crate) fn record(&mut self, shares: Shares, notional: Decimal) {
        self.trades += 1;
        self.shares += shares.get();
        self.notional += notional;
    }
}

pub(crate) fn run_pass(
    store: &mut MarketStore,
    config: &EngineConfig,
    company_id: CompanyId,
    now: DateTime<Utc>,
) -> Result<MatchReport, EngineError> {
    let Some(reference) = oracle::reference_price(store, &company_id) else {
        return Err(EngineError::CompanyNotFound { company_id });
    };

    let mut book = store.take_book(&company_id);
    let mut stats = PassStats::default();
    market::execute_market_orders(store, config, &mut book, Side::BUY, reference, now, &mut stats);
    market::execute_market_orders(store, config, &mut book, Side::SELL, reference, now, &mut stats);
    crossing::cross_limit_orders(store, &mut book, now, &mut stats);
    let swept = market::sweep_orphans(&mut book, reference, config.price_band_pct);
    store.put_book(company_id, book);

    oracle::refresh(store, &company_id);
    let closing_price = store
        .company(&company_id)
        .map(|company| company.stock_price)
        .unwrap_or(reference);

    if stats.trades > 0 || !swept.is_empty() {
        info!(
            company_id = %company_id,
            trades = stats.trades,
            shares = stats.shares,
            swept = swept.len(),
            closing_price = %closing_price,
            "matching pass complete"
        );
    }

    Ok(MatchReport {
        company_id,
        trades_executed: stats.trades,
        shares_traded: Shares::new(stats.shares),
        notional_traded: stats.notional,
        orders_swept: swept.len(),
        closing_price,
    })
}

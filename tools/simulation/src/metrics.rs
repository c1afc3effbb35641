//! Run metrics for the simulation harness
//!
//! Aggregates bot order flow, matching-pass output, and corporate-action
//! payouts across a run.

use exchange_core::MatchReport;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bots::TickOutcome;

/// Aggregated counters for one simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimMetrics {
    pub orders_submitted: u64,
    pub orders_admitted: u64,
    pub orders_swept: u64,
    pub trades_executed: u64,
    pub shares_traded: u64,
    pub notional_volume: Decimal,
    pub matching_passes: u64,
    pub days_run: u32,
    /// Cumulative gross dividends across all companies at run end
    pub dividends_paid: Decimal,
    pub elapsed_ns: u64,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one bot tick into the counters.
    pub fn record_outcome(&mut self, outcome: &TickOutcome) {
        self.orders_submitted += outcome.submitted;
        self.orders_admitted += outcome.admitted;
    }

    /// Fold one matching pass into the counters.
    pub fn record_report(&mut self, report: &MatchReport) {
        self.matching_passes += 1;
        self.trades_executed += report.trades_executed as u64;
        self.shares_traded += report.shares_traded.get();
        self.notional_volume += report.notional_traded;
        self.orders_swept += report.orders_swept as u64;
    }

    pub fn record_day(&mut self) {
        self.days_run += 1;
    }

    pub fn set_elapsed(&mut self, ns: u64) {
        self.elapsed_ns = ns;
    }

    /// Fraction of submitted orders that admission turned away.
    pub fn rejection_rate(&self) -> f64 {
        if self.orders_submitted == 0 {
            return 0.0;
        }
        1.0 - (self.orders_admitted as f64 / self.orders_submitted as f64)
    }

    /// Throughput: admitted orders per second of wall time.
    pub fn orders_per_second(&self) -> f64 {
        if self.elapsed_ns == 0 {
            return 0.0;
        }
        self.orders_admitted as f64 / (self.elapsed_ns as f64 / 1_000_000_000.0)
    }

    /// Build a one-line summary string.
    pub fn summary(&self) -> String {
        format!(
            "Days: {} | Orders: {}/{} admitted | Trades: {} | Shares: {} | Volume: {} | Dividends: {} | {:.0} orders/s",
            self.days_run,
            self.orders_admitted,
            self.orders_submitted,
            self.trades_executed,
            self.shares_traded,
            self.notional_volume,
            self.dividends_paid,
            self.orders_per_second(),
        )
    }
}

//! Simulation scenarios
//!
//! Each scenario drives the harness through a scripted flow and checks
//! the ledger invariants that must survive it. A failed check marks the
//! result rather than panicking, so the harness binary can report every
//! scenario in one run.

pub mod dividend_quarter;
pub mod split_cycle;
pub mod trading_day;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub days_run: u32,
    pub orders_submitted: u64,
    pub trades_executed: u64,
    pub dividends_paid: Decimal,
    pub passed: bool,
    pub details: String,
}

impl ScenarioResult {
    /// Result for a scenario that could not even start.
    pub(crate) fn setup_failure(name: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            name: name.to_string(),
            days_run: 0,
            orders_submitted: 0,
            trades_executed: 0,
            dividends_paid: Decimal::ZERO,
            passed: false,
            details: format!("setup failed: {detail}"),
        }
    }
}

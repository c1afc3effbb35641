//! Quarter-end dividend scenario
//!
//! Starts a few days before a quarter boundary, gives every listing a
//! working balance sheet through bond issues and business investment,
//! and runs across the boundary. Checks that the accrued dividend pool
//! actually lands in shareholder cash on the quarter-end date.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use exchange_core::EngineConfig;

use crate::scenarios::ScenarioResult;
use crate::sim::{SimConfig, Simulation};

/// Configuration for the dividend-quarter scenario.
#[derive(Debug, Clone)]
pub struct DividendQuarterConfig {
    pub seed: u64,
    /// Days to run; the default start date reaches the boundary on day 6
    pub days: u32,
    /// Bond principal raised per listing to fund operations
    pub bond_principal: Decimal,
    /// Portion of the raise invested into business assets
    pub invested: Decimal,
}

impl Default for DividendQuarterConfig {
    fn default() -> Self {
        Self {
            seed: 11,
            days: 7,
            bond_principal: Decimal::from(500_000),
            invested: Decimal::from(400_000),
        }
    }
}

/// Run trading across a quarter end and check the dividend payout.
pub fn run(config: &DividendQuarterConfig) -> ScenarioResult {
    let name = "dividend_quarter";
    let quarter_end = NaiveDate::from_ymd_opt(2024, 3, 31);

    // A fresh company routes every cent of cash flow into working
    // capital until the target is filled; zero the target so payouts
    // land inside the scenario window.
    let engine = EngineConfig {
        start_date: NaiveDate::from_ymd_opt(2024, 3, 25).expect("valid date"),
        working_capital_target_pct: Decimal::ZERO,
        ..Default::default()
    };
    let sim_config = SimConfig {
        seed: config.seed,
        days: config.days,
        engine,
        ..Default::default()
    };
    let mut sim = match Simulation::new(sim_config) {
        Ok(sim) => sim,
        Err(err) => return ScenarioResult::setup_failure(name, err),
    };

    let roster = sim.companies().to_vec();
    for company_id in roster {
        if let Err(err) = sim.market_mut().issue_bonds(company_id, config.bond_principal) {
            return ScenarioResult::setup_failure(name, err);
        }
        if let Err(err) = sim.market_mut().invest_in_business(company_id, config.invested) {
            return ScenarioResult::setup_failure(name, err);
        }
    }

    let cash_before = sim.total_cash();
    if let Err(err) = sim.run() {
        return ScenarioResult::setup_failure(name, err);
    }
    let cash_after = sim.total_cash();

    let mut failures = Vec::new();
    let metrics = sim.metrics();
    if metrics.dividends_paid <= Decimal::ZERO {
        failures.push("no dividends were paid".to_string());
    }
    if cash_after <= cash_before {
        failures.push(format!(
            "shareholder cash did not grow: {cash_before} before, {cash_after} after"
        ));
    }
    for &company_id in sim.companies() {
        let Some(company) = sim.market().company(&company_id) else {
            failures.push(format!("company {company_id} vanished"));
            continue;
        };
        if company.last_dividend_payout != quarter_end {
            failures.push(format!(
                "{}: last payout {:?}, expected {:?}",
                company.ticker, company.last_dividend_payout, quarter_end
            ));
        }
        let held = sim.market().store().sum_holdings(&company_id);
        if held != company.outstanding_shares {
            failures.push(format!(
                "{}: holdings {} != outstanding {}",
                company.ticker, held, company.outstanding_shares
            ));
        }
    }

    let passed = failures.is_empty();
    let details = if passed {
        format!(
            "paid {} across the quarter end; shareholder cash grew by {}; {}",
            metrics.dividends_paid,
            cash_after - cash_before,
            metrics.summary()
        )
    } else {
        failures.join("; ")
    };

    ScenarioResult {
        name: name.to_string(),
        days_run: metrics.days_run,
        orders_submitted: metrics.orders_submitted,
        trades_executed: metrics.trades_executed,
        dividends_paid: metrics.dividends_paid,
        passed,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_end_pays_dividends() {
        let result = run(&DividendQuarterConfig::default());
        assert!(result.passed, "{}", result.details);
        assert!(result.dividends_paid > Decimal::ZERO);
    }

    #[test]
    fn test_stopping_short_of_the_boundary_pays_nothing() {
        let config = DividendQuarterConfig {
            days: 3,
            ..Default::default()
        };
        let result = run(&config);
        assert!(!result.passed);
        assert!(result.details.contains("no dividends were paid"));
    }
}

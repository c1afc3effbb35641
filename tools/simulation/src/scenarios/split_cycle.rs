//! Stock split scenario
//!
//! Trades for a few days, splits the first listing mid-run, then keeps
//! trading. Checks that the split rescales price and positions in
//! lockstep, touches no cash, and leaves a market that still prints
//! trades afterwards.

use types::numeric::SplitRatio;

use crate::scenarios::ScenarioResult;
use crate::sim::{SimConfig, Simulation};

/// Configuration for the split-cycle scenario.
#[derive(Debug, Clone)]
pub struct SplitCycleConfig {
    pub seed: u64,
    pub numerator: u64,
    pub denominator: u64,
    pub pre_days: u32,
    pub post_days: u32,
}

impl Default for SplitCycleConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            numerator: 2,
            denominator: 1,
            pre_days: 2,
            post_days: 2,
        }
    }
}

/// Run trading days around a stock split and check the rescaling.
pub fn run(config: &SplitCycleConfig) -> ScenarioResult {
    let name = "split_cycle";
    let Some(ratio) = SplitRatio::try_new(config.numerator, config.denominator) else {
        return ScenarioResult::setup_failure(name, "split ratio terms must be positive");
    };

    let sim_config = SimConfig {
        seed: config.seed,
        days: config.pre_days,
        ..Default::default()
    };
    let mut sim = match Simulation::new(sim_config) {
        Ok(sim) => sim,
        Err(err) => return ScenarioResult::setup_failure(name, err),
    };
    let company_id = sim.companies()[0];

    if let Err(err) = sim.run_days(config.pre_days) {
        return ScenarioResult::setup_failure(name, err);
    }

    let cash_before = sim.total_cash();
    let Some(price_before) = sim.market().company(&company_id).map(|c| c.stock_price) else {
        return ScenarioResult::setup_failure(name, "listing vanished before the split");
    };

    if let Err(err) = sim.market_mut().execute_stock_split(company_id, ratio) {
        return ScenarioResult::setup_failure(name, err);
    }

    let mut failures = Vec::new();
    // the post-split refresh re-quotes off the rescaled best ask when one rests
    let best_ask = sim
        .market()
        .order_book(company_id)
        .ok()
        .and_then(|view| view.sell.iter().filter_map(|order| order.limit_price()).min());
    let expected_price = best_ask.unwrap_or_else(|| ratio.apply_to_price(price_before));
    match sim.market().company(&company_id) {
        Some(company) => {
            if company.stock_price != expected_price {
                failures.push(format!(
                    "price {} after split, expected {}",
                    company.stock_price, expected_price
                ));
            }
            let held = sim.market().store().sum_holdings(&company_id);
            if held != company.outstanding_shares {
                failures.push(format!(
                    "holdings {} != outstanding {} after split",
                    held, company.outstanding_shares
                ));
            }
        }
        None => failures.push("listing vanished during the split".to_string()),
    }
    if sim.total_cash() != cash_before {
        failures.push("split moved shareholder cash".to_string());
    }

    let trades_before_resume = sim.metrics().trades_executed;
    if let Err(err) = sim.run_days(config.post_days) {
        return ScenarioResult::setup_failure(name, err);
    }
    if sim.metrics().trades_executed == trades_before_resume {
        failures.push("no trades printed after the split".to_string());
    }
    if let Some(company) = sim.market().company(&company_id) {
        let held = sim.market().store().sum_holdings(&company_id);
        if held != company.outstanding_shares {
            failures.push(format!(
                "holdings {} != outstanding {} after resumed trading",
                held, company.outstanding_shares
            ));
        }
    }

    let metrics = sim.metrics();
    let passed = failures.is_empty();
    let details = if passed {
        format!("{} split applied; {}", ratio, metrics.summary())
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

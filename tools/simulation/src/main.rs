//! Simulation harness binary
//!
//! Runs every scenario with its default configuration, logs the
//! verdicts, and prints the full results as JSON. Exits nonzero when
//! any scenario fails its checks.

use simulation::scenarios::dividend_quarter::{self, DividendQuarterConfig};
use simulation::scenarios::split_cycle::{self, SplitCycleConfig};
use simulation::scenarios::trading_day::{self, TradingDayConfig};
use simulation::scenarios::ScenarioResult;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();
    tracing::info!(version = simulation::VERSION, "starting simulation harness");

    let results: Vec<ScenarioResult> = vec![
        trading_day::run(&TradingDayConfig::default()),
        split_cycle::run(&SplitCycleConfig::default()),
        dividend_quarter::run(&DividendQuarterConfig::default()),
    ];

    for result in &results {
        if result.passed {
            tracing::info!(
                scenario = %result.name,
                days = result.days_run,
                trades = result.trades_executed,
                "scenario passed"
            );
        } else {
            tracing::error!(
                scenario = %result.name,
                details = %result.details,
                "scenario failed"
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    if results.iter().any(|result| !result.passed) {
        std::process::exit(1);
    }
    Ok(())
}

//! Deterministic Market Simulation Harness
//!
//! Drives the `exchange-core` market through simulated trading days using
//! seeded bot populations. Every run with the same configuration and seed
//! produces the same order flow, trades, prices, and corporate actions.
//!
//! # Modules
//! - `sim` — Day-loop harness wiring bot populations to the market
//! - `bots` — Founder, retail, and institutional order-flow bots
//! - `scenarios` — End-to-end runs with pass/fail invariant checks
//! - `metrics` — Flow counters and run summaries

pub mod bots;
pub mod metrics;
pub mod scenarios;
pub mod sim;

/// Crate version constant
pub const VERSION: &str = "1.0.0";

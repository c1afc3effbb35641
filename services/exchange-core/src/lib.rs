//! Securities market engine
//!
//! Owns all market state and every rule that mutates it: order admission,
//! the per-company matching pass, trade settlement through the ledger,
//! price discovery, corporate actions (quarterly dividends, stock splits),
//! and the daily financial tick that drives company balance sheets.
//!
//! The synchronous [`Market`] facade is the single entry point for state
//! changes; [`Exchange`] wraps it for shared async access, and the
//! [`scheduler`] drives recurring matching passes and simulated days.

mod admission;
pub mod book;
pub mod config;
pub mod corporate;
pub mod exchange;
mod financials;
mod ledger;
pub mod market;
pub mod matching;
mod oracle;
pub mod scheduler;
pub mod store;

pub use book::{BookView, OrderBook};
pub use config::EngineConfig;
pub use corporate::{CeoPolicy, DividendSummary};
pub use exchange::Exchange;
pub use market::Market;
pub use matching::MatchReport;
pub use scheduler::{SchedulerConfig, SchedulerHandle};
pub use store::MarketStore;

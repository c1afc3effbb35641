//! Types library for the securities market simulator
//!
//! This library provides all core type definitions shared across the market
//! engine and its tooling, ensuring type safety and deterministic arithmetic.
//!
//! # Modules
//! - `ids`: Unique identifiers (ShareholderId, CompanyId, OrderId, TransactionId, Ticker)
//! - `numeric`: Money and share-count types (Price, Shares, SplitRatio)
//! - `order`: Order lifecycle types (Side, OrderPrice, Order)
//! - `transaction`: Settled-trade record types
//! - `company`: Company entity, sector classification, financial block
//! - `shareholder`: Shareholder entity, investor profiles, portfolio entries
//! - `errors`: Error taxonomy

// Public modules
pub mod company;
pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod shareholder;
pub mod transaction;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::company::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::shareholder::*;
    pub use crate::transaction::*;
}

//! Error types for the market engine
//!
//! Comprehensive error taxonomy using thiserror. Every rejection carries
//! enough context to report the failure without re-querying state.

use crate::ids::{CompanyId, OrderId, ShareholderId};
use crate::numeric::Shares;
use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level engine error, returned at the facade boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Admission rejected: {0}")]
    Admission(#[from] AdmissionError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Corporate action error: {0}")]
    CorporateAction(#[from] CorporateActionError),

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    #[error("Company not found: {company_id}")]
    CompanyNotFound { company_id: CompanyId },

    #[error("Shareholder not found: {shareholder_id}")]
    ShareholderNotFound { shareholder_id: ShareholderId },
}

/// Order admission rejections
///
/// Reported synchronously; no state is mutated on any rejection path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdmissionError {
    #[error("Unknown shareholder: {shareholder_id}")]
    UnknownShareholder { shareholder_id: ShareholderId },

    #[error("Unknown company: {company_id}")]
    UnknownCompany { company_id: CompanyId },

    #[error("Order must request at least one share")]
    ZeroShares,

    #[error("Invalid limit price: {price}")]
    InvalidLimitPrice { price: Decimal },

    #[error("Not enough available shares: requested {requested}, available {available}")]
    NotEnoughAvailableShares { requested: Shares, available: Shares },

    #[error("Insufficient funds: required {required}, cash {cash}")]
    InsufficientFunds { required: Decimal, cash: Decimal },

    #[error("Insufficient shares: requested {requested}, sellable {sellable}")]
    InsufficientShares { requested: Shares, sellable: Shares },
}

/// Ledger failures
///
/// An invariant violation means the requested transfer was refused before
/// any mutation; the triggering fill is skipped, never half-applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Settlement would violate balance invariants: {detail}")]
    SettlementInvariantViolation { detail: String },

    #[error("Shareholder not found: {shareholder_id}")]
    ShareholderNotFound { shareholder_id: ShareholderId },

    #[error("Company not found: {company_id}")]
    CompanyNotFound { company_id: CompanyId },
}

/// Corporate action failures
///
/// A dividend or split over a company with no portfolios is a no-op,
/// not an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorporateActionError {
    #[error("Invalid split ratio {numerator}:{denominator}")]
    InvalidSplitRatio { numerator: u64, denominator: u64 },

    #[error("Company not found: {company_id}")]
    CompanyNotFound { company_id: CompanyId },

    #[error("Policy fraction {field} must lie in [0, 1], got {value}")]
    InvalidPolicyFraction { field: &'static str, value: Decimal },

    #[error("Treasury amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    #[error("Insufficient company cash: requested {requested}, cash {cash}")]
    InsufficientCompanyCash { requested: Decimal, cash: Decimal },
}

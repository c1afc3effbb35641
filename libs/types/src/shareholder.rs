//! Shareholder entity, investor profiles, and portfolio entries
//!
//! Cash and share positions are owned by the ledger; nothing else mutates
//! them. A portfolio entry exists only while its share count is positive.

use crate::ids::{CompanyId, ShareholderId};
use crate::numeric::Shares;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Investor behavior profile
///
/// Opaque to the engine; the simulation harness uses it to parameterize
/// trading behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestorProfile {
    /// Company founder holding the initial float
    Founder,
    /// Retail trader placing frequent small orders
    DayTrader,
    /// Retail investor accumulating and holding
    LongTerm,
    /// Institution placing larger orders around a valuation
    Institutional,
}

impl InvestorProfile {
    pub const ALL: [InvestorProfile; 4] = [
        InvestorProfile::Founder,
        InvestorProfile::DayTrader,
        InvestorProfile::LongTerm,
        InvestorProfile::Institutional,
    ];
}

/// A market participant holding cash and share positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shareholder {
    pub shareholder_id: ShareholderId,
    pub name: String,
    pub profile: InvestorProfile,
    /// Cash balance; never negative
    pub cash: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Shareholder {
    /// Create a new shareholder
    ///
    /// # Panics
    /// Panics if the initial cash is negative
    pub fn new(
        name: impl Into<String>,
        profile: InvestorProfile,
        initial_cash: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        assert!(
            initial_cash >= Decimal::ZERO,
            "Initial cash must be non-negative"
        );
        Self {
            shareholder_id: ShareholderId::new(),
            name: name.into(),
            profile,
            cash: initial_cash,
            created_at,
        }
    }
}

/// A (shareholder, company) share position
///
/// At most one entry exists per pair, and only while `shares > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    pub shareholder_id: ShareholderId,
    pub company_id: CompanyId,
    pub shares: Shares,
}

impl Portfolio {
    pub fn new(shareholder_id: ShareholderId, company_id: CompanyId, shares: Shares) -> Self {
        Self {
            shareholder_id,
            company_id,
            shares,
        }
    }
}

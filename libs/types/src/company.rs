//! Company entity, sector classification, and the financial-state block
//!
//! The financial block is advanced by the daily tick and feeds the dividend
//! accrual account; balance-sheet aggregates are derived, never stored.

use crate::ids::{CompanyId, ShareholderId, Ticker};
use crate::numeric::{Price, Shares};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// GICS-style sector classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Energy,
    Materials,
    Industrials,
    ConsumerDiscretionary,
    ConsumerStaples,
    HealthCare,
    Financials,
    InformationTechnology,
    CommunicationServices,
    Utilities,
    RealEstate,
}

impl Sector {
    pub const ALL: [Sector; 11] = [
        Sector::Energy,
        Sector::Materials,
        Sector::Industrials,
        Sector::ConsumerDiscretionary,
        Sector::ConsumerStaples,
        Sector::HealthCare,
        Sector::Financials,
        Sector::InformationTechnology,
        Sector::CommunicationServices,
        Sector::Utilities,
        Sector::RealEstate,
    ];
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sector::Energy => "Energy",
            Sector::Materials => "Materials",
            Sector::Industrials => "Industrials",
            Sector::ConsumerDiscretionary => "Consumer Discretionary",
            Sector::ConsumerStaples => "Consumer Staples",
            Sector::HealthCare => "Health Care",
            Sector::Financials => "Financials",
            Sector::InformationTechnology => "Information Technology",
            Sector::CommunicationServices => "Communication Services",
            Sector::Utilities => "Utilities",
            Sector::RealEstate => "Real Estate",
        };
        write!(f, "{}", name)
    }
}

/// Balance-sheet and income-model state advanced by the daily tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    // Assets
    pub cash: Decimal,
    pub short_term_investments: Decimal,
    pub business_assets: Decimal,
    pub working_capital: Decimal,
    pub marketable_securities: Decimal,

    // Liabilities
    pub issued_bonds: Decimal,
    pub issued_debt: Decimal,

    // Income model
    pub annual_revenue: Decimal,
    pub cost_of_revenue_pct: Decimal,
    pub rd_spend_pct: Decimal,

    // CEO policy fractions
    pub capex_pct: Decimal,
    pub dividend_payout_pct: Decimal,
    pub cash_allocation_pct: Decimal,

    /// Simulated date of the last daily tick
    pub last_update: Option<NaiveDate>,
}

impl Default for CompanyFinancials {
    fn default() -> Self {
        Self {
            cash: Decimal::ZERO,
            short_term_investments: Decimal::ZERO,
            business_assets: Decimal::from(100),
            working_capital: Decimal::ZERO,
            marketable_securities: Decimal::ZERO,
            issued_bonds: Decimal::ZERO,
            issued_debt: Decimal::ZERO,
            annual_revenue: Decimal::ZERO,
            cost_of_revenue_pct: Decimal::new(7, 1),  // 0.7
            rd_spend_pct: Decimal::new(1, 1),         // 0.1
            capex_pct: Decimal::new(5, 1),            // 0.5
            dividend_payout_pct: Decimal::new(2, 1),  // 0.2
            cash_allocation_pct: Decimal::new(5, 1),  // 0.5
            last_update: None,
        }
    }
}

impl CompanyFinancials {
    /// Sum of all asset positions
    pub fn total_assets(&self) -> Decimal {
        self.cash
            + self.short_term_investments
            + self.business_assets
            + self.working_capital
            + self.marketable_securities
    }

    /// Sum of all liability positions
    pub fn total_liabilities(&self) -> Decimal {
        self.issued_bonds + self.issued_debt
    }

    /// Assets minus liabilities
    pub fn total_equity(&self) -> Decimal {
        self.total_assets() - self.total_liabilities()
    }
}

/// A listed company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_id: CompanyId,
    pub name: String,
    pub ticker: Ticker,
    pub sector: Sector,
    pub founder_id: ShareholderId,
    pub stock_price: Price,
    pub outstanding_shares: Shares,

    /// Accrued cash awaiting the next quarterly distribution
    pub dividend_account: Decimal,
    /// Cumulative gross dividends distributed over the company's life
    pub dividends_paid: Decimal,
    pub last_dividend_payout: Option<NaiveDate>,

    pub financials: CompanyFinancials,
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company with default financials
    pub fn new(
        name: impl Into<String>,
        ticker: Ticker,
        sector: Sector,
        founder_id: ShareholderId,
        stock_price: Price,
        outstanding_shares: Shares,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            company_id: CompanyId::new(),
            name: name.into(),
            ticker,
            sector,
            founder_id,
            stock_price,
            outstanding_shares,
            dividend_account: Decimal::ZERO,
            dividends_paid: Decimal::ZERO,
            last_dividend_payout: None,
            financials: CompanyFinancials::default(),
            created_at,
        }
    }

    /// Market capitalization at the current stock price
    pub fn market_cap(&self) -> Decimal {
        self.stock_price.notional(self.outstanding_shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_company() -> Company {
        Company::new(
            "Sara Corp",
            Ticker::new("SARA"),
            Sector::InformationTechnology,
            ShareholderId::new(),
            Price::from_u64(100),
            Shares::new(200),
            Utc::now(),
        )
    }

    #[test]
    fn test_company_creation_defaults() {
        let company = make_company();
        assert_eq!(company.dividend_account, Decimal::ZERO);
        assert_eq!(company.dividends_paid, Decimal::ZERO);
        assert!(company.last_dividend_payout.is_none());
        assert_eq!(company.financials.business_assets, Decimal::from(100));
    }

    #[test]
    fn test_market_cap() {
        let company = make_company();
        assert_eq!(company.market_cap(), Decimal::from(20_000));
    }

    #[test]
    fn test_financial_aggregates() {
        let mut financials = CompanyFinancials::default();
        financials.cash = Decimal::from(50);
        financials.working_capital = Decimal::from(10);
        financials.issued_bonds = Decimal::from(40);

        // 50 + 0 + 100 + 10 + 0
        assert_eq!(financials.total_assets(), Decimal::from(160));
        assert_eq!(financials.total_liabilities(), Decimal::from(40));
        assert_eq!(financials.total_equity(), Decimal::from(120));
    }

    #[test]
    fn test_default_income_model_ratios() {
        let financials = CompanyFinancials::default();
        assert_eq!(financials.cost_of_revenue_pct, Decimal::new(7, 1));
        assert_eq!(financials.rd_spend_pct, Decimal::new(1, 1));
        assert_eq!(financials.capex_pct, Decimal::new(5, 1));
    }

    #[test]
    fn test_sector_display_names() {
        assert_eq!(Sector::HealthCare.to_string(), "Health Care");
        assert_eq!(
            Sector::ConsumerDiscretionary.to_string(),
            "Consumer Discretionary"
        );
        assert_eq!(Sector::ALL.len(), 11);
    }

    #[test]
    fn test_company_serialization() {
        let company = make_company();
        let json = serde_json::to_string(&company).unwrap();
        let deserialized: Company = serde_json::from_str(&json).unwrap();

        assert_eq!(company.company_id, deserialized.company_id);
        assert_eq!(company.stock_price, deserialized.stock_price);
        assert_eq!(company.financials, deserialized.financials);
    }
}

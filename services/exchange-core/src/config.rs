//! Engine configuration

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tunable parameters for matching, settlement, and corporate actions.
///
/// Rates are fractions (`0.10` = 10%); interest rates are annual and
/// accrued daily over a 365-day year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Half-width of the market-order execution band, as a fraction of
    /// the reference price
    pub price_band_pct: Decimal,
    /// Withholding tax applied to dividend payouts
    pub withholding_tax_rate: Decimal,
    /// Corporate tax applied to positive pre-tax income
    pub corporate_tax_rate: Decimal,
    /// Annual interest rate on issued bonds
    pub bond_interest_rate: Decimal,
    /// Annual interest rate on issued debt
    pub debt_interest_rate: Decimal,
    /// Working-capital target as a fraction of total assets
    pub working_capital_target_pct: Decimal,
    /// Annual revenue generated per unit of business assets
    pub asset_turnover_ratio: Decimal,
    /// First simulated calendar day
    pub start_date: NaiveDate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price_band_pct: Decimal::new(1, 1),          // 0.10
            withholding_tax_rate: Decimal::new(2, 1),    // 0.20
            corporate_tax_rate: Decimal::new(21, 2),     // 0.21
            bond_interest_rate: Decimal::new(5, 2),      // 0.05
            debt_interest_rate: Decimal::new(6, 2),      // 0.06
            working_capital_target_pct: Decimal::new(1, 1), // 0.10
            asset_turnover_ratio: Decimal::ONE,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        }
    }
}

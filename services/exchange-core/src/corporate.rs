//! Corporate actions
//!
//! Quarterly dividends distribute each company's accrued dividend account
//! pro rata to holders of record, net of withholding tax. Stock splits
//! rescale positions, resting orders, and the quoted price in one step,
//! with integer flooring absorbed by reconciling the outstanding count
//! from actual positions.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::errors::CorporateActionError;
use types::ids::CompanyId;
use types::numeric::SplitRatio;

use crate::config::EngineConfig;
use crate::ledger;
use crate::oracle;
use crate::store::MarketStore;

/// One company's completed dividend distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendSummary {
    pub company_id: CompanyId,
    /// Pool distributed, before withholding
    pub gross: Decimal,
    pub holders_paid: usize,
    pub payout_date: NaiveDate,
}

/// CEO-controlled routing of the daily cash flow, all fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CeoPolicy {
    pub capex_pct: Decimal,
    pub dividend_payout_pct: Decimal,
    pub cash_allocation_pct: Decimal,
}

impl CeoPolicy {
    fn validate(&self) -> Result<(), CorporateActionError> {
        for (field, value) in [
            ("capex_pct", self.capex_pct),
            ("dividend_payout_pct", self.dividend_payout_pct),
            ("cash_allocation_pct", self.cash_allocation_pct),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(CorporateActionError::InvalidPolicyFraction { field, value });
            }
        }
        Ok(())
    }
}

/// Adopt a new cash-flow routing policy for a company.
pub(crate) fn set_ceo_policy(
    store: &mut MarketStore,
    company_id: CompanyId,
    policy: CeoPolicy,
) -> Result<(), CorporateActionError> {
    policy.validate()?;
    let company = store
        .company_mut(&company_id)
        .ok_or(CorporateActionError::CompanyNotFound { company_id })?;
    company.financials.capex_pct = policy.capex_pct;
    company.financials.dividend_payout_pct = policy.dividend_payout_pct;
    company.financials.cash_allocation_pct = policy.cash_allocation_pct;
    info!(company_id = %company_id, ?policy, "ceo policy updated");
    Ok(())
}

/// Raise capital through a bond issue: cash and the bond liability grow
/// together, and the daily tick starts charging interest on it.
pub(crate) fn issue_bonds(
    store: &mut MarketStore,
    company_id: CompanyId,
    amount: Decimal,
) -> Result<(), CorporateActionError> {
    let company = positive_amount_company(store, company_id, amount)?;
    company.financials.cash += amount;
    company.financials.issued_bonds += amount;
    info!(company_id = %company_id, %amount, "bonds issued");
    Ok(())
}

/// Raise capital through a debt facility, at the higher debt rate.
pub(crate) fn issue_debt(
    store: &mut MarketStore,
    company_id: CompanyId,
    amount: Decimal,
) -> Result<(), CorporateActionError> {
    let company = positive_amount_company(store, company_id, amount)?;
    company.financials.cash += amount;
    company.financials.issued_debt += amount;
    info!(company_id = %company_id, %amount, "debt issued");
    Ok(())
}

/// Deploy company cash into revenue-generating business assets.
pub(crate) fn invest_in_business(
    store: &mut MarketStore,
    company_id: CompanyId,
    amount: Decimal,
) -> Result<(), CorporateActionError> {
    let company = positive_amount_company(store, company_id, amount)?;
    if company.financials.cash < amount {
        return Err(CorporateActionError::InsufficientCompanyCash {
            requested: amount,
            cash: company.financials.cash,
        });
    }
    company.financials.cash -= amount;
    company.financials.business_assets += amount;
    info!(company_id = %company_id, %amount, "cash deployed into business assets");
    Ok(())
}

fn positive_amount_company(
    store: &mut MarketStore,
    company_id: CompanyId,
    amount: Decimal,
) -> Result<&mut types::company::Company, CorporateActionError> {
    if amount <= Decimal::ZERO {
        return Err(CorporateActionError::NonPositiveAmount { amount });
    }
    store
        .company_mut(&company_id)
        .ok_or(CorporateActionError::CompanyNotFound { company_id })
}

/// True on the last calendar day of March, June, September, and December.
pub(crate) fn is_quarter_end(date: NaiveDate) -> bool {
    matches!(date.month(), 3 | 6 | 9 | 12) && is_last_day_of_month(date)
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt()
        .map(|next| next.month() != date.month())
        .unwrap_or(true)
}

/// Distribute every company's dividend account to holders of record.
///
/// Off quarter-end dates this is a no-op, as is any company with an empty
/// account, no holders, or a payout already stamped for `date`.
pub(crate) fn pay_quarterly_dividends(
    store: &mut MarketStore,
    config: &EngineConfig,
    date: NaiveDate,
) -> Vec<DividendSummary> {
    if !is_quarter_end(date) {
        return Vec::new();
    }

    let mut summaries = Vec::new();
    for company_id in store.company_ids() {
        let Some(company) = store.company(&company_id) else {
            continue;
        };
        if company.dividend_account <= Decimal::ZERO {
            continue;
        }
        if company.last_dividend_payout == Some(date) {
            continue;
        }
        let pool = company.dividend_account;
        let outstanding = company.outstanding_shares;
        if outstanding.is_zero() {
            continue;
        }
        let holders = store.holders_of(&company_id);
        if holders.is_empty() {
            continue;
        }

        let net_rate = Decimal::ONE - config.withholding_tax_rate;
        let mut holders_paid = 0usize;
        for (shareholder_id, held) in holders {
            let gross = pool * Decimal::from(held.get()) / Decimal::from(outstanding.get());
            let net = (gross * net_rate).round_dp(2);
            match ledger::credit_dividend(store, shareholder_id, net) {
                Ok(()) => holders_paid += 1,
                Err(error) => {
                    warn!(
                        company_id = %company_id,
                        shareholder_id = %shareholder_id,
                        %error,
                        "dividend credit skipped"
                    );
                }
            }
        }

        if let Some(company) = store.company_mut(&company_id) {
            company.dividends_paid += pool;
            company.dividend_account = Decimal::ZERO;
            company.last_dividend_payout = Some(date);
        }
        info!(
            company_id = %company_id,
            gross = %pool,
            holders = holders_paid,
            date = %date,
            "quarterly dividend distributed"
        );
        summaries.push(DividendSummary {
            company_id,
            gross: pool,
            holders_paid,
            payout_date: date,
        });
    }
    summaries
}

/// Apply a stock split: positions floor-scale by the ratio, resting orders
/// rescale in place, the quoted price scales inversely, and outstanding is
/// reconciled from the scaled positions.
pub(crate) fn execute_split(
    store: &mut MarketStore,
    company_id: CompanyId,
    ratio: SplitRatio,
) -> Result<(), CorporateActionError> {
    let Some(company) = store.company(&company_id) else {
        return Err(CorporateActionError::CompanyNotFound { company_id });
    };
    let old_price = company.stock_price;

    let holders = store.holders_of(&company_id);
    if holders.is_empty() {
        return Ok(());
    }
    for (shareholder_id, held) in holders {
        store.set_holding(shareholder_id, company_id, ratio.apply_to_shares(held));
    }

    let removed = store.book_mut(&company_id).rescale(&ratio);
    for order_id in &removed {
        warn!(order_id = %order_id, "order dropped: quantity rounded to zero by split");
    }

    // the trade-price reference must follow the new share scale
    store.rescale_last_trade(&company_id, &ratio);

    let outstanding = store.sum_holdings(&company_id);
    if let Some(company) = store.company_mut(&company_id) {
        company.outstanding_shares = outstanding;
        company.stock_price = ratio.apply_to_price(old_price);
    }
    oracle::refresh(store, &company_id);

    info!(
        company_id = %company_id,
        ratio = %ratio,
        outstanding = %outstanding,
        "stock split executed"
    );
    Ok(())
}

//! Daily financial tick
//!
//! Advances one company's balance sheet by one simulated day: revenue is
//! earned from business assets, costs, interest, and tax come out, and
//! the surviving cash flow is routed through working capital, capex, the
//! dividend accrual account, and cash allocation. The whole block is
//! computed on a copy and written back in one step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use types::company::Company;

use crate::config::EngineConfig;

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Run one day's tick. Returns false (and touches nothing) when the
/// company has already been ticked for `date`.
pub(crate) fn run_daily_tick(company: &mut Company, config: &EngineConfig, date: NaiveDate) -> bool {
    if company.financials.last_update == Some(date) {
        return false;
    }
    let mut f = company.financials.clone();
    let mut dividend_accrual = Decimal::ZERO;

    // income statement for the day
    f.annual_revenue = f.business_assets * config.asset_turnover_ratio;
    let revenue = f.annual_revenue / DAYS_PER_YEAR;
    let cost_of_revenue = revenue * f.cost_of_revenue_pct;
    let rd_spend = revenue * f.rd_spend_pct;
    let operating_income = revenue - cost_of_revenue - rd_spend;
    let interest = (f.issued_bonds * config.bond_interest_rate
        + f.issued_debt * config.debt_interest_rate)
        / DAYS_PER_YEAR;
    let pre_tax_income = operating_income - interest;
    let tax = if pre_tax_income > Decimal::ZERO {
        pre_tax_income * config.corporate_tax_rate
    } else {
        Decimal::ZERO
    };
    let net_income = pre_tax_income - tax;

    // net income converts to the day's operating cash flow one-for-one
    let mut cash_flow = net_income;

    // steer working capital toward its target share of total assets,
    // funded from today's cash flow first, then short-term investments;
    // excess is released back into the day's cash flow
    let target = f.total_assets() * config.working_capital_target_pct;
    let gap = target - f.working_capital;
    if gap > Decimal::ZERO {
        let from_operations = gap.min(cash_flow.max(Decimal::ZERO));
        cash_flow -= from_operations;
        let shortfall = gap - from_operations;
        let from_investments = shortfall.min(f.short_term_investments);
        f.short_term_investments -= from_investments;
        f.working_capital += from_operations + from_investments;
    } else if gap < Decimal::ZERO {
        f.working_capital += gap;
        cash_flow -= gap;
    }

    if cash_flow > Decimal::ZERO {
        let capex = cash_flow * f.capex_pct;
        f.business_assets += capex;
        let after_capex = cash_flow - capex;
        dividend_accrual = after_capex * f.dividend_payout_pct;
        let remainder = after_capex - dividend_accrual;
        f.cash += remainder * f.cash_allocation_pct;
        f.short_term_investments += remainder * (Decimal::ONE - f.cash_allocation_pct);
    } else {
        // a loss day draws down company cash
        f.cash += cash_flow;
    }

    f.last_update = Some(date);
    company.financials = f;
    company.dividend_account += dividend_accrual;

    debug!(
        company_id = %company.company_id,
        date = %date,
        net_income = %net_income,
        dividend_accrual = %dividend_accrual,
        "daily financial tick"
    );
    true
}

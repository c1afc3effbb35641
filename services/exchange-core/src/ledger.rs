//! Settlement ledger
//!
//! Every cash or share movement goes through this module. A transfer is
//! verified in full before anything is written, so a refused settlement
//! leaves the store untouched; there are no partial applications.
//!
//! After each trade the company's outstanding share count is reconciled
//! against the sum of all positions, which keeps conservation exact even
//! across integer-flooring corporate actions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use types::errors::LedgerError;
use types::ids::{CompanyId, ShareholderId};
use types::numeric::{Price, Shares};
use types::transaction::Transaction;

use crate::store::MarketStore;

/// Atomically settle a trade: move cash from buyer to seller, shares from
/// seller to buyer, and append the transaction to the log.
pub(crate) fn settle(
    store: &mut MarketStore,
    buyer_id: ShareholderId,
    seller_id: ShareholderId,
    company_id: CompanyId,
    shares: Shares,
    price: Price,
    executed_at: DateTime<Utc>,
) -> Result<Transaction, LedgerError> {
    let notional = price.notional(shares);

    // verify phase: nothing is mutated until every check passes
    if shares.is_zero() {
        return Err(LedgerError::SettlementInvariantViolation {
            detail: "zero-share settlement".to_string(),
        });
    }
    let buyer_cash = store
        .shareholder(&buyer_id)
        .ok_or(LedgerError::ShareholderNotFound {
            shareholder_id: buyer_id,
        })?
        .cash;
    store
        .shareholder(&seller_id)
        .ok_or(LedgerError::ShareholderNotFound {
            shareholder_id: seller_id,
        })?;
    store
        .company(&company_id)
        .ok_or(LedgerError::CompanyNotFound { company_id })?;
    // a self-trade moves no net cash, so only cross-party trades need funding
    if buyer_id != seller_id && buyer_cash < notional {
        return Err(LedgerError::SettlementInvariantViolation {
            detail: format!("buyer cash {buyer_cash} below trade value {notional}"),
        });
    }
    let seller_held = store.holding(&seller_id, &company_id);
    if seller_held < shares {
        return Err(LedgerError::SettlementInvariantViolation {
            detail: format!("seller holds {seller_held} of {shares} shares"),
        });
    }

    // apply phase
    if let Some(buyer) = store.shareholder_mut(&buyer_id) {
        buyer.cash -= notional;
    }
    if let Some(seller) = store.shareholder_mut(&seller_id) {
        seller.cash += notional;
    }
    let buyer_held = store.holding(&buyer_id, &company_id);
    store.set_holding(buyer_id, company_id, buyer_held + shares);
    // re-read: for a self-trade the buyer write touched the same row
    let seller_now = store.holding(&seller_id, &company_id);
    store.set_holding(seller_id, company_id, seller_now.saturating_sub(shares));

    let transaction = Transaction::new(buyer_id, seller_id, company_id, shares, price, executed_at);
    store.record_transaction(transaction.clone());
    reconcile_outstanding(store, &company_id);
    Ok(transaction)
}

/// Credit a dividend payout to a shareholder's cash balance.
pub(crate) fn credit_dividend(
    store: &mut MarketStore,
    shareholder_id: ShareholderId,
    amount: Decimal,
) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::SettlementInvariantViolation {
            detail: format!("negative dividend credit {amount}"),
        });
    }
    let shareholder =
        store
            .shareholder_mut(&shareholder_id)
            .ok_or(LedgerError::ShareholderNotFound { shareholder_id })?;
    shareholder.cash += amount;
    Ok(())
}

/// Recompute a company's outstanding share count from its positions.
pub(crate) fn reconcile_outstanding(store: &mut MarketStore, company_id: &CompanyId) {
    let total = store.sum_holdings(company_id);
    if let Some(company) = store.company_mut(company_id) {
        company.outstanding_shares = total;
    }
}

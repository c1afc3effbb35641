//! Order admission
//!
//! Validates a new order against current ledger and book state before it
//! may rest. Checks run in a fixed order and the first failure wins;
//! nothing is mutated on any rejection path.
//!
//! Market buys are admitted without a funds check: they are capped to
//! affordable quantity at execution time instead, since their eventual
//! price is unknown here.

use chrono::{DateTime, Utc};
use tracing::debug;
use types::errors::AdmissionError;
use types::ids::{CompanyId, ShareholderId};
use types::numeric::Shares;
use types::order::{Order, OrderPrice, Side};

use crate::store::MarketStore;

pub(crate) fn admit(
    store: &mut MarketStore,
    shareholder_id: ShareholderId,
    company_id: CompanyId,
    side: Side,
    pricing: OrderPrice,
    shares: Shares,
    now: DateTime<Utc>,
) -> Result<Order, AdmissionError> {
    let cash = store
        .shareholder(&shareholder_id)
        .ok_or(AdmissionError::UnknownShareholder { shareholder_id })?
        .cash;
    let outstanding = store
        .company(&company_id)
        .ok_or(AdmissionError::UnknownCompany { company_id })?
        .outstanding_shares;
    if shares.is_zero() {
        return Err(AdmissionError::ZeroShares);
    }

    let held = store.holding(&shareholder_id, &company_id);
    match side {
        Side::BUY => {
            // a buyer may not chase more shares than could ever be delivered:
            // outstanding, minus what they hold, minus what they already bid for
            let open_buys = store.open_buy_shares(&shareholder_id, &company_id);
            let available = outstanding.saturating_sub(held).saturating_sub(open_buys);
            if shares > available {
                return Err(AdmissionError::NotEnoughAvailableShares {
                    requested: shares,
                    available,
                });
            }
            if let OrderPrice::Limit(price) = pricing {
                let committed = store.open_buy_commitment(&shareholder_id);
                let required = committed + price.notional(shares);
                if required > cash {
                    return Err(AdmissionError::InsufficientFunds { required, cash });
                }
            }
        }
        Side::SELL => {
            let open_sells = store.open_sell_shares(&shareholder_id, &company_id);
            let sellable = held.saturating_sub(open_sells);
            if shares > sellable {
                return Err(AdmissionError::InsufficientShares {
                    requested: shares,
                    sellable,
                });
            }
        }
    }

    let order = Order::new(shareholder_id, company_id, side, pricing, shares, now);
    debug!(
        order_id = %order.order_id,
        shareholder_id = %shareholder_id,
        company_id = %company_id,
        side = ?side,
        shares = %shares,
        "order admitted"
    );
    store.book_mut(&company_id).insert(order.clone());
    Ok(order)
}

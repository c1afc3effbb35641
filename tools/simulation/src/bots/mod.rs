//! Order-flow bots
//!
//! Each bot owns a shareholder identity and a deterministic seeded RNG.
//! On every tick a bot inspects the market through the public facade and
//! submits zero or more orders; admission decides what actually rests,
//! and a rejection is ordinary flow rather than an error.

pub mod founder;
pub mod institutional;
pub mod retail;

use exchange_core::Market;
use types::ids::{CompanyId, ShareholderId};
use types::numeric::Shares;
use types::order::{OrderPrice, Side};

/// Orders attempted and admitted during one bot tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    pub submitted: u64,
    pub admitted: u64,
}

impl TickOutcome {
    pub fn record(&mut self, admitted: bool) {
        self.submitted += 1;
        if admitted {
            self.admitted += 1;
        }
    }
}

/// A participant wired into the simulation day loop.
///
/// `companies` is the listing roster in creation order, which keeps
/// company selection reproducible across runs.
pub trait Bot {
    fn shareholder_id(&self) -> ShareholderId;
    fn tick(&mut self, market: &mut Market, companies: &[CompanyId]) -> TickOutcome;
}

/// Submit one order and fold the admission verdict into the outcome.
pub(crate) fn submit(
    market: &mut Market,
    outcome: &mut TickOutcome,
    shareholder_id: ShareholderId,
    company_id: CompanyId,
    side: Side,
    pricing: OrderPrice,
    shares: Shares,
) {
    let admitted = market
        .place_order(shareholder_id, company_id, side, pricing, shares)
        .is_ok();
    outcome.record(admitted);
}

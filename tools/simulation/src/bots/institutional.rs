//! Institutional block-trading bot
//!
//! Works toward a target position in every listing, trading in large
//! blocks at aggressive limit prices so that resting retail and founder
//! liquidity actually gets taken. Quotes only every few ticks.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{CompanyId, ShareholderId};
use types::numeric::{Price, Shares};
use types::order::{OrderPrice, Side};

use crate::bots::{submit, Bot, TickOutcome};
use exchange_core::Market;

/// Configuration for the institutional bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstitutionalConfig {
    /// Shares per block order
    pub block_shares: u64,
    /// Holdings level the bot accumulates toward, per company
    pub target_shares: u64,
    /// Average ticks between quotes
    pub quote_interval: u32,
    /// Limit aggression in bps past the quoted price
    pub aggression_bps: u32,
}

impl Default for InstitutionalConfig {
    fn default() -> Self {
        Self {
            block_shares: 100,
            target_shares: 500,
            quote_interval: 4,
            aggression_bps: 100,
        }
    }
}

/// Block trader with a deterministic seed.
pub struct InstitutionalBot {
    pub shareholder_id: ShareholderId,
    pub config: InstitutionalConfig,
    rng: ChaCha8Rng,
}

impl InstitutionalBot {
    pub fn new(shareholder_id: ShareholderId, config: InstitutionalConfig, seed: u64) -> Self {
        Self {
            shareholder_id,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Bot for InstitutionalBot {
    fn shareholder_id(&self) -> ShareholderId {
        self.shareholder_id
    }

    /// Below target: aggressive block buy. At or above target: trim one
    /// block at a discount. Skips most ticks per `quote_interval`.
    fn tick(&mut self, market: &mut Market, companies: &[CompanyId]) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if companies.is_empty() {
            return outcome;
        }
        if self.config.quote_interval > 1 && self.rng.gen_range(0..self.config.quote_interval) != 0
        {
            return outcome;
        }

        let company_id = companies[self.rng.gen_range(0..companies.len())];
        let Some(company) = market.company(&company_id) else {
            return outcome;
        };
        let reference = company.stock_price.as_decimal();
        let held = market.store().holding(&self.shareholder_id, &company_id);

        let aggression =
            reference * Decimal::from(self.config.aggression_bps) / Decimal::from(10_000);
        let (side, raw, quantity) = if held.get() < self.config.target_shares {
            (Side::BUY, reference + aggression, self.config.block_shares)
        } else {
            let trim = self.config.block_shares.min(held.get());
            (Side::SELL, reference - aggression, trim)
        };
        if quantity == 0 {
            return outcome;
        }
        let Some(price) = Price::try_new(raw.round_dp(2)) else {
            return outcome;
        };

        submit(
            market,
            &mut outcome,
            self.shareholder_id,
            company_id,
            side,
            OrderPrice::Limit(price),
            Shares::new(quantity),
        );
        outcome
    }
}

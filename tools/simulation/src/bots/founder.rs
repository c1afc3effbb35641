//! Founder liquidity bot
//!
//! Each founder starts holding the entire float of their own listing and
//! feeds it into the market as limit asks at a small premium over the
//! quote. A retained stake is never offered, so the founder keeps control
//! while the float circulates.

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

/// Configuration for the founder liquidity bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FounderConfig {
    /// Shares per ask
    pub chunk_shares: u64,
    /// Premium range over the quote, in bps
    pub min_premium_bps: u32,
    pub max_premium_bps: u32,
    /// Shares the founder never offers for sale
    pub retained_shares: u64,
}

impl Default for FounderConfig {
    fn default() -> Self {
        Self {
            chunk_shares: 50,
            min_premium_bps: 10,
            max_premium_bps: 200,
            retained_shares: 1_000,
        }
    }
}

/// Sells the float of one listing in chunks; ignores other companies.
pub struct FounderBot {
    pub shareholder_id: ShareholderId,
    pub company_id: CompanyId,
    pub config: FounderConfig,
    rng: ChaCha8Rng,
}

impl FounderBot {
    pub fn new(
        shareholder_id: ShareholderId,
        company_id: CompanyId,
        config: FounderConfig,
        seed: u64,
    ) -> Self {
        Self {
            shareholder_id,
            company_id,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Bot for FounderBot {
    fn shareholder_id(&self) -> ShareholderId {
        self.shareholder_id
    }

    fn tick(&mut self, market: &mut Market, _companies: &[CompanyId]) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let Some(company) = market.company(&self.company_id) else {
            return outcome;
        };
        let reference = company.stock_price.as_decimal();

        let held = market.store().holding(&self.shareholder_id, &self.company_id);
        let committed = market
            .store()
            .open_sell_shares(&self.shareholder_id, &self.company_id);
        let sellable = held
            .saturating_sub(committed)
            .get()
            .saturating_sub(self.config.retained_shares);
        let chunk = self.config.chunk_shares.min(sellable);
        if chunk == 0 {
            return outcome;
        }

        let bps = self
            .rng
            .gen_range(self.config.min_premium_bps..=self.config.max_premium_bps);
        let premium = reference * Decimal::from(bps) / Decimal::from(10_000);
        let Some(price) = Price::try_new((reference + premium).round_dp(2)) else {
            return outcome;
        };

        submit(
            market,
            &mut outcome,
            self.shareholder_id,
            self.company_id,
            Side::SELL,
            OrderPrice::Limit(price),
            Shares::new(chunk),
        );
        outcome
    }
}

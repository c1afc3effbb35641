//! Retail order-flow bots
//!
//! `DayTraderBot` produces a churning mix of market and limit orders
//! around the quoted price. `LongTermBot` accumulates slowly and rarely
//! trims. Both draw every decision from a deterministic seeded RNG.

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

/// Configuration for the day-trading bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayTraderConfig {
    /// Minimum order size in shares
    pub min_shares: u64,
    /// Maximum order size in shares
    pub max_shares: u64,
    /// Probability of a market order (0.0 to 1.0)
    pub market_order_ratio: f64,
    /// Maximum distance from the quoted price for limit orders (in bps)
    pub max_limit_distance_bps: u32,
}

impl Default for DayTraderConfig {
    fn default() -> Self {
        Self {
            min_shares: 1,
            max_shares: 25,
            market_order_ratio: 0.3,
            max_limit_distance_bps: 300,
        }
    }
}

/// Churning retail trader with a deterministic seed.
pub struct DayTraderBot {
    pub shareholder_id: ShareholderId,
    pub config: DayTraderConfig,
    pub orders_submitted: u64,
    rng: ChaCha8Rng,
}

impl DayTraderBot {
    pub fn new(shareholder_id: ShareholderId, config: DayTraderConfig, seed: u64) -> Self {
        Self {
            shareholder_id,
            config,
            orders_submitted: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Bot for DayTraderBot {
    fn shareholder_id(&self) -> ShareholderId {
        self.shareholder_id
    }

    /// Pick one company and submit one order: market or passive limit,
    /// BUY when the position is flat, sells capped at current holdings.
    fn tick(&mut self, market: &mut Market, companies: &[CompanyId]) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if companies.is_empty() {
            return outcome;
        }
        let company_id = companies[self.rng.gen_range(0..companies.len())];
        let Some(company) = market.company(&company_id) else {
            return outcome;
        };
        let reference = company.stock_price.as_decimal();

        let held = market.store().holding(&self.shareholder_id, &company_id);
        let side = if held.is_zero() || self.rng.gen_bool(0.5) {
            Side::BUY
        } else {
            Side::SELL
        };

        let mut quantity = self
            .rng
            .gen_range(self.config.min_shares..=self.config.max_shares);
        if side == Side::SELL {
            quantity = quantity.min(held.get());
        }
        if quantity == 0 {
            return outcome;
        }

        let pricing = if self.rng.gen_bool(self.config.market_order_ratio) {
            OrderPrice::Market
        } else {
            let bps = self.rng.gen_range(1..=self.config.max_limit_distance_bps);
            let distance = reference * Decimal::from(bps) / Decimal::from(10_000);
            let raw = match side {
                Side::BUY => reference - distance,
                Side::SELL => reference + distance,
            };
            match Price::try_new(raw.round_dp(2)) {
                Some(price) => OrderPrice::Limit(price),
                None => return outcome,
            }
        };

        submit(
            market,
            &mut outcome,
            self.shareholder_id,
            company_id,
            side,
            pricing,
            Shares::new(quantity),
        );
        self.orders_submitted += outcome.submitted;
        outcome
    }
}

/// Configuration for the buy-and-hold bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongTermConfig {
    /// Probability of adding to the position on a tick
    pub buy_probability: f64,
    /// Probability of trimming the position on a tick
    pub trim_probability: f64,
    /// Shares added per accumulation order
    pub accumulate_shares: u64,
}

impl Default for LongTermConfig {
    fn default() -> Self {
        Self {
            buy_probability: 0.25,
            trim_probability: 0.05,
            accumulate_shares: 10,
        }
    }
}

/// Patient accumulator: limit buys at the quote, occasional small trims.
pub struct LongTermBot {
    pub shareholder_id: ShareholderId,
    pub config: LongTermConfig,
    rng: ChaCha8Rng,
}

impl LongTermBot {
    pub fn new(shareholder_id: ShareholderId, config: LongTermConfig, seed: u64) -> Self {
        Self {
            shareholder_id,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Bot for LongTermBot {
    fn shareholder_id(&self) -> ShareholderId {
        self.shareholder_id
    }

    fn tick(&mut self, market: &mut Market, companies: &[CompanyId]) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if companies.is_empty() {
            return outcome;
        }
        let company_id = companies[self.rng.gen_range(0..companies.len())];
        let Some(company) = market.company(&company_id) else {
            return outcome;
        };
        let reference = company.stock_price;
        let held = market.store().holding(&self.shareholder_id, &company_id);

        if self.rng.gen_bool(self.config.buy_probability) {
            submit(
                market,
                &mut outcome,
                self.shareholder_id,
                company_id,
                Side::BUY,
                OrderPrice::Limit(reference),
                Shares::new(self.config.accumulate_shares),
            );
        } else if !held.is_zero() && self.rng.gen_bool(self.config.trim_probability) {
            let trim = (held.get() / 10).max(1);
            let raw = reference.as_decimal() * Decimal::new(102, 2);
            if let Some(price) = Price::try_new(raw.round_dp(2)) {
                submit(
                    market,
                    &mut outcome,
                    self.shareholder_id,
                    company_id,
                    Side::SELL,
                    OrderPrice::Limit(price),
                    Shares::new(trim),
                );
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::EngineConfig;
    use types::company::Sector;
    use types::ids::Ticker;
    use types::shareholder::InvestorProfile;

    fn seeded_market(cash: u64) -> (Market, CompanyId, ShareholderId) {
        let mut market = Market::new(EngineConfig::default());
        let founder = market.create_shareholder("Founder", InvestorProfile::Founder, Decimal::ZERO);
        let company = market
            .create_company(
                "Papermill",
                Ticker::new("PPR"),
                Sector::Materials,
                founder,
                Price::from_u64(100),
                Shares::new(10_000),
            )
            .unwrap();
        let trader =
            market.create_shareholder("Trader", InvestorProfile::DayTrader, Decimal::from(cash));
        (market, company, trader)
    }

    #[test]
    fn test_flat_day_trader_only_buys() {
        let (mut market, company, trader) = seeded_market(1_000_000);
        let mut bot = DayTraderBot::new(trader, DayTraderConfig::default(), 42);

        for _ in 0..50 {
            bot.tick(&mut market, &[company]);
        }

        let open = market.open_orders(&trader);
        assert!(!open.is_empty());
        assert!(open.iter().all(|order| order.side == Side::BUY));
    }

    #[test]
    fn test_zero_market_ratio_places_limits_only() {
        let (mut market, company, trader) = seeded_market(1_000_000);
        let config = DayTraderConfig {
            market_order_ratio: 0.0,
            ..Default::default()
        };
        let mut bot = DayTraderBot::new(trader, config, 7);

        for _ in 0..30 {
            bot.tick(&mut market, &[company]);
        }

        let open = market.open_orders(&trader);
        assert!(!open.is_empty());
        assert!(open.iter().all(|order| order.pricing.is_limit()));
    }

    #[test]
    fn test_limit_prices_stay_near_reference() {
        let (mut market, company, trader) = seeded_market(1_000_000);
        let config = DayTraderConfig {
            market_order_ratio: 0.0,
            max_limit_distance_bps: 300,
            ..Default::default()
        };
        let mut bot = DayTraderBot::new(trader, config, 9);

        for _ in 0..30 {
            bot.tick(&mut market, &[company]);
        }

        // No trades yet, so the quote never moved off the list price.
        let reference = Decimal::from(100);
        let tolerance = reference * Decimal::new(300, 4) + Decimal::new(1, 2);
        for order in market.open_orders(&trader) {
            let price = order.limit_price().unwrap().as_decimal();
            assert!((price - reference).abs() <= tolerance);
        }
    }

    #[test]
    fn test_empty_roster_is_a_no_op() {
        let (mut market, _company, trader) = seeded_market(1_000);
        let mut bot = DayTraderBot::new(trader, DayTraderConfig::default(), 42);
        let outcome = bot.tick(&mut market, &[]);
        assert_eq!(outcome.submitted, 0);
    }

    #[test]
    fn test_long_term_accumulates_at_the_quote() {
        let (mut market, company, trader) = seeded_market(1_000_000);
        let config = LongTermConfig {
            buy_probability: 1.0,
            ..Default::default()
        };
        let mut bot = LongTermBot::new(trader, config, 3);

        for _ in 0..5 {
            bot.tick(&mut market, &[company]);
        }

        let open = market.open_orders(&trader);
        assert_eq!(open.len(), 5);
        for order in &open {
            assert_eq!(order.side, Side::BUY);
            assert_eq!(order.limit_price(), Some(Price::from_u64(100)));
            assert_eq!(order.remaining, Shares::new(10));
        }
    }

    #[test]
    fn test_long_term_never_trims_a_flat_position() {
        let (mut market, company, trader) = seeded_market(1_000_000);
        let config = LongTermConfig {
            buy_probability: 0.0,
            trim_probability: 1.0,
            ..Default::default()
        };
        let mut bot = LongTermBot::new(trader, config, 3);

        for _ in 0..10 {
            let outcome = bot.tick(&mut market, &[company]);
            assert_eq!(outcome.submitted, 0);
        }
    }
}

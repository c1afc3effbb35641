//! Limit-order crossing
//!
//! Buys are taken highest price first, sells lowest first; a cross
//! executes at the resting sell's price whenever the buy limit covers it.
//! The fill is capped so the buyer never exceeds the outstanding share
//! count nor their cash at the execution price; a zero cap skips that
//! pairing and the buy tries the next sell.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;
use types::numeric::Shares;

use super::PassStats;
use crate::book::OrderBook;
use crate::ledger;
use crate::store::MarketStore;

pub(super) fn cross_limit_orders(
    store: &mut MarketStore,
    book: &mut OrderBook,
    now: DateTime<Utc>,
    stats: &mut PassStats,
) {
    for buy_id in book.limit_buy_ids() {
        for sell_id in book.limit_sell_ids() {
            let Some(buy) = book.get(&buy_id) else {
                break; // buy fully filled
            };
            let Some(sell) = book.get(&sell_id) else {
                continue;
            };
            let (Some(buy_price), Some(sell_price)) = (buy.limit_price(), sell.limit_price())
            else {
                continue;
            };
            if buy_price < sell_price {
                break; // sells ascend; nothing further can cross
            }

            let buyer_id = buy.shareholder_id;
            let seller_id = sell.shareholder_id;
            let company_id = buy.company_id;

            let mut quantity = buy.remaining.min(sell.remaining);
            let outstanding = store
                .company(&company_id)
                .map(|company| company.outstanding_shares)
                .unwrap_or(Shares::ZERO);
            let buyer_held = store.holding(&buyer_id, &company_id);
            quantity = quantity.min(outstanding.saturating_sub(buyer_held));
            let buyer_cash = store
                .shareholder(&buyer_id)
                .map(|s| s.cash)
                .unwrap_or(Decimal::ZERO);
            quantity = quantity.min(sell_price.affordable_shares(buyer_cash));
            if quantity.is_zero() {
                continue;
            }

            // execution at the resting sell's price
            match ledger::settle(
                store, buyer_id, seller_id, company_id, quantity, sell_price, now,
            ) {
                Ok(transaction) => {
                    book.fill(&buy_id, quantity);
                    book.fill(&sell_id, quantity);
                    stats.record(quantity, transaction.notional());
                }
                Err(error) => {
                    warn!(
                        buy_id = %buy_id,
                        sell_id = %sell_id,
                        %error,
                        "cross refused by ledger, skipping"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::company::{Company, Sector};
    use types::ids::{CompanyId, OrderId, ShareholderId, Ticker};
    use types::numeric::Price;
    use types::order::{Order, OrderPrice, Side};
    use types::shareholder::{InvestorProfile, Shareholder};

    struct Fixture {
        store: MarketStore,
        trader: ShareholderId,
        founder: ShareholderId,
        company: CompanyId,
    }

    fn make_fixture(trader_cash: u64) -> Fixture {
        let mut store = MarketStore::new();
        let trader = Shareholder::new(
            "Alice",
            InvestorProfile::DayTrader,
            Decimal::from(trader_cash),
            Utc::now(),
        );
        let founder = Shareholder::new("Bob", InvestorProfile::Founder, Decimal::ZERO, Utc::now());
        let trader_id = trader.shareholder_id;
        let founder_id = founder.shareholder_id;
        store.insert_shareholder(trader);
        store.insert_shareholder(founder);

        let company = Company::new(
            "Acme Corp",
            Ticker::new("ACME"),
            Sector::InformationTechnology,
            founder_id,
            Price::from_u64(100),
            Shares::new(200),
            Utc::now(),
        );
        let company_id = company.company_id;
        store.insert_company(company);
        store.set_holding(founder_id, company_id, Shares::new(200));

        Fixture {
            store,
            trader: trader_id,
            founder: founder_id,
            company: company_id,
        }
    }

    fn rest(
        book: &mut OrderBook,
        owner: ShareholderId,
        company: CompanyId,
        side: Side,
        price: u64,
        shares: u64,
    ) -> OrderId {
        let order = Order::new(
            owner,
            company,
            side,
            OrderPrice::Limit(Price::from_u64(price)),
            Shares::new(shares),
            Utc::now(),
        );
        let order_id = order.order_id;
        book.insert(order);
        order_id
    }

    #[test]
    fn test_cross_executes_at_resting_sell_price() {
        let mut fix = make_fixture(10_000);
        let mut book = OrderBook::new();
        let buy = rest(&mut book, fix.trader, fix.company, Side::BUY, 130, 50);
        let sell = rest(&mut book, fix.founder, fix.company, Side::SELL, 120, 50);

        let mut stats = PassStats::default();
        cross_limit_orders(&mut fix.store, &mut book, Utc::now(), &mut stats);

        // 50 shares at 120, not at the buy's 130
        assert_eq!(stats.trades, 1);
        assert_eq!(stats.notional, Decimal::from(6_000));
        assert_eq!(
            fix.store.shareholder(&fix.trader).unwrap().cash,
            Decimal::from(4_000)
        );
        assert_eq!(fix.store.holding(&fix.trader, &fix.company), Shares::new(50));
        assert!(!book.contains(&buy));
        assert!(!book.contains(&sell));
    }

    #[test]
    fn test_no_cross_when_buy_below_sell() {
        let mut fix = make_fixture(10_000);
        let mut book = OrderBook::new();
        let buy = rest(&mut book, fix.trader, fix.company, Side::BUY, 110, 10);
        let sell = rest(&mut book, fix.founder, fix.company, Side::SELL, 120, 10);

        let mut stats = PassStats::default();
        cross_limit_orders(&mut fix.store, &mut book, Utc::now(), &mut stats);

        assert_eq!(stats.trades, 0);
        assert!(book.contains(&buy));
        assert!(book.contains(&sell));
    }

    #[test]
    fn test_higher_buys_cross_first() {
        let mut fix = make_fixture(10_000);
        let mut book = OrderBook::new();
        let low_buy = rest(&mut book, fix.trader, fix.company, Side::BUY, 125, 10);
        let high_buy = rest(&mut book, fix.trader, fix.company, Side::BUY, 130, 10);
        let sell = rest(&mut book, fix.founder, fix.company, Side::SELL, 120, 10);

        let mut stats = PassStats::default();
        cross_limit_orders(&mut fix.store, &mut book, Utc::now(), &mut stats);

        assert_eq!(stats.trades, 1);
        assert!(!book.contains(&high_buy));
        assert!(!book.contains(&sell));
        assert_eq!(book.get(&low_buy).unwrap().remaining, Shares::new(10));
        assert_eq!(
            fix.store.shareholder(&fix.trader).unwrap().cash,
            Decimal::from(8_800)
        );
    }

    #[test]
    fn test_buyer_cash_caps_the_fill() {
        let mut fix = make_fixture(1_000);
        let mut book = OrderBook::new();
        let buy = rest(&mut book, fix.trader, fix.company, Side::BUY, 120, 20);
        let sell = rest(&mut book, fix.founder, fix.company, Side::SELL, 120, 20);

        let mut stats = PassStats::default();
        cross_limit_orders(&mut fix.store, &mut book, Utc::now(), &mut stats);

        // floor(1_000 / 120) = 8 shares settle; the rest stays on the book
        assert_eq!(stats.trades, 1);
        assert_eq!(fix.store.holding(&fix.trader, &fix.company), Shares::new(8));
        assert_eq!(
            fix.store.shareholder(&fix.trader).unwrap().cash,
            Decimal::from(40)
        );
        assert_eq!(book.get(&buy).unwrap().remaining, Shares::new(12));
        assert_eq!(book.get(&sell).unwrap().remaining, Shares::new(12));
    }
}

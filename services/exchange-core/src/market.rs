//! Market facade
//!
//! The single synchronous entry point for every market operation. Owns
//! the store, the engine configuration, and the simulated calendar; all
//! mutation goes through admission, the matching pass, the ledger, and
//! the corporate-action routines behind it.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use types::company::{Company, Sector};
use types::errors::EngineError;
use types::ids::{CompanyId, OrderId, ShareholderId, Ticker};
use types::numeric::{Price, Shares, SplitRatio};
use types::order::{Order, OrderPrice, Side};
use types::shareholder::{InvestorProfile, Portfolio, Shareholder};
use types::transaction::Transaction;

use crate::admission;
use crate::book::BookView;
use crate::config::EngineConfig;
use crate::corporate::{self, CeoPolicy, DividendSummary};
use crate::financials;
use crate::matching::{self, MatchReport};
use crate::store::MarketStore;

#[derive(Debug, Clone)]
pub struct Market {
    store: MarketStore,
    config: EngineConfig,
    today: NaiveDate,
}

impl Market {
    pub fn new(config: EngineConfig) -> Self {
        let today = config.start_date;
        Self {
            store: MarketStore::new(),
            config,
            today,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &MarketStore {
        &self.store
    }

    /// Current simulated calendar day.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Register a shareholder with an opening cash balance.
    ///
    /// # Panics
    /// Panics if `initial_cash` is negative.
    pub fn create_shareholder(
        &mut self,
        name: impl Into<String>,
        profile: InvestorProfile,
        initial_cash: Decimal,
    ) -> ShareholderId {
        let shareholder = Shareholder::new(name, profile, initial_cash, Utc::now());
        let shareholder_id = shareholder.shareholder_id;
        info!(shareholder_id = %shareholder_id, profile = ?profile, "shareholder registered");
        self.store.insert_shareholder(shareholder);
        shareholder_id
    }

    /// List a company; the founder receives the entire initial float.
    pub fn create_company(
        &mut self,
        name: impl Into<String>,
        ticker: Ticker,
        sector: Sector,
        founder_id: ShareholderId,
        initial_price: Price,
        initial_shares: Shares,
    ) -> Result<CompanyId, EngineError> {
        if self.store.shareholder(&founder_id).is_none() {
            return Err(EngineError::ShareholderNotFound {
                shareholder_id: founder_id,
            });
        }
        let company = Company::new(
            name,
            ticker,
            sector,
            founder_id,
            initial_price,
            initial_shares,
            Utc::now(),
        );
        let company_id = company.company_id;
        info!(
            company_id = %company_id,
            ticker = %company.ticker,
            price = %initial_price,
            shares = %initial_shares,
            "company listed"
        );
        self.store.insert_company(company);
        if !initial_shares.is_zero() {
            self.store.set_holding(founder_id, company_id, initial_shares);
        }
        Ok(company_id)
    }

    /// Validate and rest a new order in the company's book.
    pub fn place_order(
        &mut self,
        shareholder_id: ShareholderId,
        company_id: CompanyId,
        side: Side,
        pricing: OrderPrice,
        shares: Shares,
    ) -> Result<Order, EngineError> {
        admission::admit(
            &mut self.store,
            shareholder_id,
            company_id,
            side,
            pricing,
            shares,
            Utc::now(),
        )
        .map_err(EngineError::from)
    }

    /// Remove an open order from its book.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<(), EngineError> {
        let Some(order) = self.store.find_order(&order_id) else {
            return Err(EngineError::OrderNotFound { order_id });
        };
        let company_id = order.company_id;
        self.store.book_mut(&company_id).remove(&order_id);
        info!(order_id = %order_id, company_id = %company_id, "order cancelled");
        Ok(())
    }

    /// Run one matching pass over one company's book.
    pub fn run_matching(&mut self, company_id: CompanyId) -> Result<MatchReport, EngineError> {
        matching::run_pass(&mut self.store, &self.config, company_id, Utc::now())
    }

    /// Sorted snapshot of a company's open orders.
    pub fn order_book(&self, company_id: CompanyId) -> Result<BookView, EngineError> {
        let company = self
            .store
            .company(&company_id)
            .ok_or(EngineError::CompanyNotFound { company_id })?;
        let fallback = company.stock_price;
        Ok(self
            .store
            .book(&company_id)
            .map(|book| book.view(fallback))
            .unwrap_or(BookView {
                buy: Vec::new(),
                sell: Vec::new(),
            }))
    }

    /// Transaction history, newest first, filtered by company and/or
    /// participant when given.
    pub fn transactions(
        &self,
        company_id: Option<CompanyId>,
        shareholder_id: Option<ShareholderId>,
    ) -> Vec<Transaction> {
        self.store.transactions(company_id, shareholder_id)
    }

    /// Apply a stock split to one company.
    pub fn execute_stock_split(
        &mut self,
        company_id: CompanyId,
        ratio: SplitRatio,
    ) -> Result<(), EngineError> {
        corporate::execute_split(&mut self.store, company_id, ratio).map_err(EngineError::from)
    }

    /// Adopt a new CEO cash-flow policy for a company.
    pub fn set_ceo_policy(
        &mut self,
        company_id: CompanyId,
        policy: CeoPolicy,
    ) -> Result<(), EngineError> {
        corporate::set_ceo_policy(&mut self.store, company_id, policy).map_err(EngineError::from)
    }

    /// Raise company capital through a bond issue.
    pub fn issue_bonds(&mut self, company_id: CompanyId, amount: Decimal) -> Result<(), EngineError> {
        corporate::issue_bonds(&mut self.store, company_id, amount).map_err(EngineError::from)
    }

    /// Raise company capital through a debt facility.
    pub fn issue_debt(&mut self, company_id: CompanyId, amount: Decimal) -> Result<(), EngineError> {
        corporate::issue_debt(&mut self.store, company_id, amount).map_err(EngineError::from)
    }

    /// Deploy company cash into business assets.
    pub fn invest_in_business(
        &mut self,
        company_id: CompanyId,
        amount: Decimal,
    ) -> Result<(), EngineError> {
        corporate::invest_in_business(&mut self.store, company_id, amount)
            .map_err(EngineError::from)
    }

    /// Advance one company's financials by one day of the simulated
    /// calendar. Returns false when already ticked for today.
    pub fn run_daily_tick(&mut self, company_id: CompanyId) -> Result<bool, EngineError> {
        let Some(company) = self.store.company_mut(&company_id) else {
            return Err(EngineError::CompanyNotFound { company_id });
        };
        Ok(financials::run_daily_tick(company, &self.config, self.today))
    }

    /// Pay out quarterly dividends if today is a quarter end.
    pub fn run_corporate_actions(&mut self) -> Vec<DividendSummary> {
        corporate::pay_quarterly_dividends(&mut self.store, &self.config, self.today)
    }

    /// Move the simulated calendar forward one day: every company ticks,
    /// then quarter-end corporate actions run. Returns the new date.
    pub fn advance_day(&mut self) -> NaiveDate {
        self.today = self.today.succ_opt().unwrap_or(self.today);
        for company_id in self.store.company_ids() {
            let _ = self.run_daily_tick(company_id);
        }
        let paid = self.run_corporate_actions();
        if !paid.is_empty() {
            info!(date = %self.today, companies = paid.len(), "dividends paid at quarter end");
        }
        self.today
    }

    pub fn shareholder(&self, shareholder_id: &ShareholderId) -> Option<&Shareholder> {
        self.store.shareholder(shareholder_id)
    }

    pub fn company(&self, company_id: &CompanyId) -> Option<&Company> {
        self.store.company(company_id)
    }

    pub fn company_ids(&self) -> Vec<CompanyId> {
        self.store.company_ids()
    }

    pub fn shareholder_ids(&self) -> Vec<ShareholderId> {
        self.store.shareholder_ids()
    }

    /// A shareholder's positions as portfolio rows.
    pub fn portfolio(&self, shareholder_id: &ShareholderId) -> Vec<Portfolio> {
        self.store
            .holdings_of(shareholder_id)
            .into_iter()
            .map(|(company_id, shares)| Portfolio::new(*shareholder_id, company_id, shares))
            .collect()
    }

    /// All of a shareholder's open orders, across companies.
    pub fn open_orders(&self, shareholder_id: &ShareholderId) -> Vec<Order> {
        self.store.open_orders_of(shareholder_id)
    }
}

//! Shared async facade
//!
//! Wraps a [`Market`] in `Arc<Mutex<_>>` for use from concurrent tasks.
//! Every operation takes the lock for its full duration, so matching
//! passes, corporate actions, and order placement serialize against each
//! other; reads return owned snapshots rather than guarded references.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use types::company::{Company, Sector};
use types::errors::EngineError;
use types::ids::{CompanyId, OrderId, ShareholderId, Ticker};
use types::numeric::{Price, Shares, SplitRatio};
use types::order::{Order, OrderPrice, Side};
use types::shareholder::{InvestorProfile, Portfolio, Shareholder};
use types::transaction::Transaction;

use crate::book::BookView;
use crate::config::EngineConfig;
use crate::corporate::CeoPolicy;
use crate::market::Market;
use crate::matching::MatchReport;

#[derive(Clone)]
pub struct Exchange {
    inner: Arc<Mutex<Market>>,
}

impl Exchange {
    pub fn new(config: EngineConfig) -> Self {
        Self::from_market(Market::new(config))
    }

    /// Wrap an already-seeded market.
    pub fn from_market(market: Market) -> Self {
        Self {
            inner: Arc::new(Mutex::new(market)),
        }
    }

    pub async fn create_shareholder(
        &self,
        name: impl Into<String>,
        profile: InvestorProfile,
        initial_cash: Decimal,
    ) -> ShareholderId {
        self.inner
            .lock()
            .await
            .create_shareholder(name, profile, initial_cash)
    }

    pub async fn create_company(
        &self,
        name: impl Into<String>,
        ticker: Ticker,
        sector: Sector,
        founder_id: ShareholderId,
        initial_price: Price,
        initial_shares: Shares,
    ) -> Result<CompanyId, EngineError> {
        self.inner.lock().await.create_company(
            name,
            ticker,
            sector,
            founder_id,
            initial_price,
            initial_shares,
        )
    }

    pub async fn place_order(
        &self,
        shareholder_id: ShareholderId,
        company_id: CompanyId,
        side: Side,
        pricing: OrderPrice,
        shares: Shares,
    ) -> Result<Order, EngineError> {
        self.inner
            .lock()
            .await
            .place_order(shareholder_id, company_id, side, pricing, shares)
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> Result<(), EngineError> {
        self.inner.lock().await.cancel_order(order_id)
    }

    pub async fn run_matching(&self, company_id: CompanyId) -> Result<MatchReport, EngineError> {
        self.inner.lock().await.run_matching(company_id)
    }

    pub async fn order_book(&self, company_id: CompanyId) -> Result<BookView, EngineError> {
        self.inner.lock().await.order_book(company_id)
    }

    pub async fn transactions(
        &self,
        company_id: Option<CompanyId>,
        shareholder_id: Option<ShareholderId>,
    ) -> Vec<Transaction> {
        self.inner.lock().await.transactions(company_id, shareholder_id)
    }

    pub async fn execute_stock_split(
        &self,
        company_id: CompanyId,
        ratio: SplitRatio,
    ) -> Result<(), EngineError> {
        self.inner.lock().await.execute_stock_split(company_id, ratio)
    }

    pub async fn set_ceo_policy(
        &self,
        company_id: CompanyId,
        policy: CeoPolicy,
    ) -> Result<(), EngineError> {
        self.inner.lock().await.set_ceo_policy(company_id, policy)
    }

    pub async fn issue_bonds(
        &self,
        company_id: CompanyId,
        amount: Decimal,
    ) -> Result<(), EngineError> {
        self.inner.lock().await.issue_bonds(company_id, amount)
    }

    pub async fn issue_debt(
        &self,
        company_id: CompanyId,
        amount: Decimal,
    ) -> Result<(), EngineError> {
        self.inner.lock().await.issue_debt(company_id, amount)
    }

    pub async fn invest_in_business(
        &self,
        company_id: CompanyId,
        amount: Decimal,
    ) -> Result<(), EngineError> {
        self.inner.lock().await.invest_in_business(company_id, amount)
    }

    pub async fn advance_day(&self) -> NaiveDate {
        self.inner.lock().await.advance_day()
    }

    pub async fn today(&self) -> NaiveDate {
        self.inner.lock().await.today()
    }

    pub async fn company_ids(&self) -> Vec<CompanyId> {
        self.inner.lock().await.company_ids()
    }

    pub async fn shareholder(&self, shareholder_id: ShareholderId) -> Option<Shareholder> {
        self.inner.lock().await.shareholder(&shareholder_id).cloned()
    }

    pub async fn company(&self, company_id: CompanyId) -> Option<Company> {
        self.inner.lock().await.company(&company_id).cloned()
    }

    pub async fn portfolio(&self, shareholder_id: ShareholderId) -> Vec<Portfolio> {
        self.inner.lock().await.portfolio(&shareholder_id)
    }

    pub async fn open_orders(&self, shareholder_id: ShareholderId) -> Vec<Order> {
        self.inner.lock().await.open_orders(&shareholder_id)
    }
}

//! In-memory market state
//!
//! [`MarketStore`] owns every entity the engine operates on: shareholders,
//! companies, holdings, per-company order books, and the transaction log.
//! Reads are public; writes are crate-private so that all mutation flows
//! through admission, the ledger, and the corporate-action routines.
//!
//! BTreeMap keys make iteration order deterministic, which keeps matching
//! passes and dividend runs reproducible for a given input sequence.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use types::company::Company;
use types::ids::{CompanyId, OrderId, ShareholderId};
use types::numeric::{Price, Shares};
use types::order::Order;
use types::shareholder::Shareholder;
use types::transaction::Transaction;

use crate::book::OrderBook;

#[derive(Debug, Clone, Default)]
pub struct MarketStore {
    shareholders: BTreeMap<ShareholderId, Shareholder>,
    companies: BTreeMap<CompanyId, Company>,
    /// (company, shareholder) -> held shares; rows are removed at zero
    holdings: BTreeMap<(CompanyId, ShareholderId), Shares>,
    books: BTreeMap<CompanyId, OrderBook>,
    transactions: Vec<Transaction>,
    /// Most recent trade price per company, rescaled on splits
    last_trade: BTreeMap<CompanyId, Price>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shareholder(&self, shareholder_id: &ShareholderId) -> Option<&Shareholder> {
        self.shareholders.get(shareholder_id)
    }

    pub fn company(&self, company_id: &CompanyId) -> Option<&Company> {
        self.companies.get(company_id)
    }

    pub fn shareholders(&self) -> impl Iterator<Item = &Shareholder> {
        self.shareholders.values()
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.companies.values()
    }

    pub fn shareholder_ids(&self) -> Vec<ShareholderId> {
        self.shareholders.keys().copied().collect()
    }

    pub fn company_ids(&self) -> Vec<CompanyId> {
        self.companies.keys().copied().collect()
    }

    /// Shares of `company_id` held by `shareholder_id` (zero if no row).
    pub fn holding(&self, shareholder_id: &ShareholderId, company_id: &CompanyId) -> Shares {
        self.holdings
            .get(&(*company_id, *shareholder_id))
            .copied()
            .unwrap_or(Shares::ZERO)
    }

    /// Every holder of `company_id` with a non-zero position.
    pub fn holders_of(&self, company_id: &CompanyId) -> Vec<(ShareholderId, Shares)> {
        self.holdings
            .iter()
            .filter(|((company, _), _)| company == company_id)
            .map(|((_, shareholder), shares)| (*shareholder, *shares))
            .collect()
    }

    /// Every non-zero position held by `shareholder_id`.
    pub fn holdings_of(&self, shareholder_id: &ShareholderId) -> Vec<(CompanyId, Shares)> {
        self.holdings
            .iter()
            .filter(|((_, shareholder), _)| shareholder == shareholder_id)
            .map(|((company, _), shares)| (*company, *shares))
            .collect()
    }

    /// Sum of all positions in `company_id` (the reconciled share count).
    pub fn sum_holdings(&self, company_id: &CompanyId) -> Shares {
        self.holders_of(company_id)
            .into_iter()
            .fold(Shares::ZERO, |total, (_, shares)| total + shares)
    }

    pub fn book(&self, company_id: &CompanyId) -> Option<&OrderBook> {
        self.books.get(company_id)
    }

    /// Locate an open order in any company's book.
    pub fn find_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.books.values().find_map(|book| book.get(order_id))
    }

    /// All open orders placed by `shareholder_id`, across companies.
    pub fn open_orders_of(&self, shareholder_id: &ShareholderId) -> Vec<Order> {
        self.books
            .values()
            .flat_map(|book| book.orders_of(shareholder_id))
            .collect()
    }

    /// Shares requested by a shareholder's open buys in one company.
    pub fn open_buy_shares(&self, shareholder_id: &ShareholderId, company_id: &CompanyId) -> Shares {
        self.books
            .get(company_id)
            .map(|book| book.open_buy_shares(shareholder_id))
            .unwrap_or(Shares::ZERO)
    }

    /// Shares offered by a shareholder's open sells in one company.
    pub fn open_sell_shares(
        &self,
        shareholder_id: &ShareholderId,
        company_id: &CompanyId,
    ) -> Shares {
        self.books
            .get(company_id)
            .map(|book| book.open_sell_shares(shareholder_id))
            .unwrap_or(Shares::ZERO)
    }

    /// Cash committed by a shareholder's open limit buys across all books.
    pub fn open_buy_commitment(&self, shareholder_id: &ShareholderId) -> Decimal {
        self.books
            .values()
            .map(|book| book.limit_buy_commitment(shareholder_id))
            .sum()
    }

    /// Transaction history, newest first, optionally filtered by company
    /// and/or participant.
    pub fn transactions(
        &self,
        company_id: Option<CompanyId>,
        shareholder_id: Option<ShareholderId>,
    ) -> Vec<Transaction> {
        self.transactions
            .iter()
            .rev()
            .filter(|txn| company_id.map_or(true, |id| txn.company_id == id))
            .filter(|txn| shareholder_id.map_or(true, |id| txn.involves(id)))
            .cloned()
            .collect()
    }

    pub fn transaction_log(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn last_trade_price(&self, company_id: &CompanyId) -> Option<Price> {
        self.last_trade.get(company_id).copied()
    }

    pub(crate) fn insert_shareholder(&mut self, shareholder: Shareholder) {
        self.shareholders.insert(shareholder.shareholder_id, shareholder);
    }

    pub(crate) fn insert_company(&mut self, company: Company) {
        self.books.insert(company.company_id, OrderBook::new());
        self.companies.insert(company.company_id, company);
    }

    pub(crate) fn shareholder_mut(
        &mut self,
        shareholder_id: &ShareholderId,
    ) -> Option<&mut Shareholder> {
        self.shareholders.get_mut(shareholder_id)
    }

    pub(crate) fn company_mut(&mut self, company_id: &CompanyId) -> Option<&mut Company> {
        self.companies.get_mut(company_id)
    }

    /// Set a position outright; zero deletes the row.
    pub(crate) fn set_holding(
        &mut self,
        shareholder_id: ShareholderId,
        company_id: CompanyId,
        shares: Shares,
    ) {
        if shares.is_zero() {
            self.holdings.remove(&(company_id, shareholder_id));
        } else {
            self.holdings.insert((company_id, shareholder_id), shares);
        }
    }

    pub(crate) fn book_mut(&mut self, company_id: &CompanyId) -> &mut OrderBook {
        self.books.entry(*company_id).or_default()
    }

    /// Detach a company's book so settlement can mutate the store while
    /// the matching pass walks the book. Pair with [`Self::put_book`].
    pub(crate) fn take_book(&mut self, company_id: &CompanyId) -> OrderBook {
        self.books.remove(company_id).unwrap_or_default()
    }

    pub(crate) fn put_book(&mut self, company_id: CompanyId, book: OrderBook) {
        self.books.insert(company_id, book);
    }

    pub(crate) fn record_transaction(&mut self, transaction: Transaction) {
        self.last_trade
            .insert(transaction.company_id, transaction.price);
        self.transactions.push(transaction);
    }

    pub(crate) fn rescale_last_trade(
        &mut self,
        company_id: &CompanyId,
        ratio: &types::numeric::SplitRatio,
    ) {
        if let Some(price) = self.last_trade.get_mut(company_id) {
            *price = ratio.apply_to_price(*price);
        }
    }
}

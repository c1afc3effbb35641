//! Settled-trade record types
//!
//! A Transaction is written once per settlement and never mutated; the
//! transaction log is the append-only history of all executed trades.

use crate::ids::{CompanyId, ShareholderId, TransactionId};
use crate::numeric::{Price, Shares};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable record of one settled trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub buyer_id: ShareholderId,
    pub seller_id: ShareholderId,
    pub company_id: CompanyId,
    pub shares: Shares,
    pub price: Price,
    pub executed_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction record
    pub fn new(
        buyer_id: ShareholderId,
        seller_id: ShareholderId,
        company_id: CompanyId,
        shares: Shares,
        price: Price,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: TransactionId::new(),
            buyer_id,
            seller_id,
            company_id,
            shares,
            price,
            executed_at,
        }
    }

    /// Total cash moved by this trade (price × shares)
    pub fn notional(&self) -> Decimal {
        self.price.notional(self.shares)
    }

    /// Check whether the given shareholder was a party to this trade
    pub fn involves(&self, shareholder_id: ShareholderId) -> bool {
        self.buyer_id == shareholder_id || self.seller_id == shareholder_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_transaction(shares: u64, price: u64) -> Transaction {
        Transaction::new(
            ShareholderId::new(),
            ShareholderId::new(),
            CompanyId::new(),
            Shares::new(shares),
            Price::from_u64(price),
            Utc::now(),
        )
    }

    #[test]
    fn test_transaction_notional() {
        let txn = make_transaction(83, 120);
        assert_eq!(txn.notional(), Decimal::from(9960));
    }

    #[test]
    fn test_transaction_involves_both_parties() {
        let txn = make_transaction(10, 50);
        assert!(txn.involves(txn.buyer_id));
        assert!(txn.involves(txn.seller_id));
        assert!(!txn.involves(ShareholderId::new()));
    }

    #[test]
    fn test_transaction_serialization() {
        let txn = make_transaction(10, 50);
        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(txn.transaction_id, deserialized.transaction_id);
        assert_eq!(txn.shares, deserialized.shares);
        assert_eq!(txn.price, deserialized.price);
    }
}

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    errors::Result,
    ledger::{IdSource, Ledger, Payment, Transaction},
};

use super::KeyValueStore;

pub const TRANSACTIONS_KEY: &str = "fishTransactions";
pub const PAYMENTS_KEY: &str = "fishPayments";

/// The two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionName {
    Transactions,
    Payments,
}

impl CollectionName {
    pub fn key(self) -> &'static str {
        match self {
            CollectionName::Transactions => TRANSACTIONS_KEY,
            CollectionName::Payments => PAYMENTS_KEY,
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Serialises ledger collections into a [`KeyValueStore`].
///
/// Loading is forgiving: a missing, unreadable or malformed blob yields an
/// empty collection, and a single bad row is dropped without losing the
/// rest. Both cases leave a warning in the log.
pub struct LedgerStore {
    backend: Box<dyn KeyValueStore>,
}

impl LedgerStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn save<T: Serialize>(&self, name: CollectionName, collection: &[T]) -> Result<()> {
        let json = serde_json::to_string(collection)?;
        self.backend.set(name.key(), &json)?;
        tracing::debug!(collection = %name, rows = collection.len(), "collection saved");
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self, name: CollectionName) -> Vec<T> {
        let raw = match self.backend.get(name.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(
                    collection = %name,
                    error = %err,
                    "unreadable collection, starting empty"
                );
                return Vec::new();
            }
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(
                    collection = %name,
                    error = %err,
                    "malformed collection, starting empty"
                );
                return Vec::new();
            }
        };

        let total = values.len();
        let rows: Vec<T> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(row) => Some(row),
                Err(err) => {
                    tracing::debug!(collection = %name, error = %err, "skipping row");
                    None
                }
            })
            .collect();
        let skipped = total - rows.len();
        if skipped > 0 {
            tracing::warn!(collection = %name, skipped, "dropped unreadable rows");
        }
        rows
    }

    pub fn save_transactions(&self, ledger: &Ledger) -> Result<()> {
        self.save(CollectionName::Transactions, ledger.transactions())
    }

    pub fn save_payments(&self, ledger: &Ledger) -> Result<()> {
        self.save(CollectionName::Payments, ledger.payments())
    }

    pub fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        self.save_transactions(ledger)?;
        self.save_payments(ledger)
    }

    /// Restores both collections into a ledger that draws ids from `ids`.
    pub fn load_ledger(&self, ids: Box<dyn IdSource>) -> Ledger {
        let transactions: Vec<Transaction> = self.load(CollectionName::Transactions);
        let payments: Vec<Payment> = self.load(CollectionName::Payments);
        tracing::debug!(
            transactions = transactions.len(),
            payments = payments.len(),
            "ledger loaded"
        );
        Ledger::from_parts(ids, transactions, payments)
    }

    /// Drops both blobs.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(TRANSACTIONS_KEY)?;
        self.backend.remove(PAYMENTS_KEY)
    }
}

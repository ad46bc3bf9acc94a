use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::Result;

use super::{
    coerce::ValidationMode,
    ids::IdSource,
    payment::{Payment, PaymentField},
    pricing::{Branch, RateType},
    transaction::{Transaction, TransactionField},
};

/// Sales and advance payments for one customer book.
///
/// Both collections keep insertion order. Every row id comes from the
/// injected [`IdSource`].
#[derive(Debug)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    payments: Vec<Payment>,
    validation: ValidationMode,
    ids: Box<dyn IdSource>,
}

/// Aggregate figures for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub transaction_count: usize,
    pub payment_count: usize,
    pub grand_total: f64,
    pub advance_total: f64,
    pub due: f64,
}

impl Ledger {
    pub fn new(ids: Box<dyn IdSource>) -> Self {
        Self {
            transactions: Vec::new(),
            payments: Vec::new(),
            validation: ValidationMode::default(),
            ids,
        }
    }

    /// Rebuilds a ledger from persisted rows. Ids are reserved with the id
    /// source and derived values are recomputed.
    pub fn from_parts(
        ids: Box<dyn IdSource>,
        transactions: Vec<Transaction>,
        payments: Vec<Payment>,
    ) -> Self {
        let mut ledger = Self::new(ids);
        ledger.replace_transactions(transactions);
        for payment in &payments {
            ledger.ids.observe(&payment.id);
        }
        ledger.payments = payments;
        ledger
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn set_validation(&mut self, validation: ValidationMode) {
        self.validation = validation;
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    pub fn ids_mut(&mut self) -> &mut dyn IdSource {
        self.ids.as_mut()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn payment(&self, id: &str) -> Option<&Payment> {
        self.payments.iter().find(|payment| payment.id == id)
    }

    /// Appends a zero-size `Small` row for `branch` dated `date`.
    pub fn add_transaction(&mut self, date: NaiveDate, branch: Branch) -> &Transaction {
        let id = self.ids.next_id();
        tracing::debug!(%id, %branch, "adding transaction");
        let index = self.transactions.len();
        self.transactions
            .push(Transaction::new(id, date, branch, 0.0, RateType::Small));
        &self.transactions[index]
    }

    /// Edits one field of the row `id`; unknown ids are ignored. Only strict
    /// validation can fail.
    pub fn update_transaction(
        &mut self,
        id: &str,
        field: TransactionField,
        raw: &str,
    ) -> Result<&[Transaction]> {
        let validation = self.validation;
        match self.transactions.iter_mut().find(|txn| txn.id == id) {
            Some(txn) => {
                if txn.apply(field, raw, validation)? {
                    tracing::debug!(id, ?field, raw, "transaction updated");
                }
            }
            None => tracing::debug!(id, "update for unknown transaction ignored"),
        }
        Ok(&self.transactions)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        tracing::debug!(id, "deleting transaction");
        Some(self.transactions.remove(index))
    }

    pub fn add_payment(&mut self, date: NaiveDate) -> &Payment {
        let id = self.ids.next_id();
        tracing::debug!(%id, "adding payment");
        let index = self.payments.len();
        self.payments.push(Payment::new(id, date, 0.0));
        &self.payments[index]
    }

    pub fn update_payment(
        &mut self,
        id: &str,
        field: PaymentField,
        raw: &str,
    ) -> Result<&[Payment]> {
        let validation = self.validation;
        match self.payments.iter_mut().find(|payment| payment.id == id) {
            Some(payment) => {
                if payment.apply(field, raw, validation)? {
                    tracing::debug!(id, ?field, raw, "payment updated");
                }
            }
            None => tracing::debug!(id, "update for unknown payment ignored"),
        }
        Ok(&self.payments)
    }

    pub fn delete_payment(&mut self, id: &str) -> Option<Payment> {
        let index = self.payments.iter().position(|payment| payment.id == id)?;
        tracing::debug!(id, "deleting payment");
        Some(self.payments.remove(index))
    }

    /// Swaps in a new transaction list wholesale (payments untouched).
    /// Returns the number of rows now held.
    pub fn replace_transactions(&mut self, mut transactions: Vec<Transaction>) -> usize {
        for txn in &mut transactions {
            self.ids.observe(&txn.id);
            txn.refresh();
        }
        self.transactions = transactions;
        self.transactions.len()
    }

    /// Empties both collections. Callers are expected to confirm first.
    pub fn clear_all(&mut self) {
        tracing::info!(
            transactions = self.transactions.len(),
            payments = self.payments.len(),
            "clearing ledger"
        );
        self.transactions.clear();
        self.payments.clear();
    }

    pub fn grand_total(&self) -> f64 {
        self.transactions.iter().map(|txn| txn.total).sum()
    }

    pub fn advance_total(&self) -> f64 {
        self.payments.iter().map(|payment| payment.amount).sum()
    }

    /// Signed balance; negative means the customer has overpaid.
    pub fn due(&self) -> f64 {
        self.grand_total() - self.advance_total()
    }

    pub fn summary(&self) -> LedgerSummary {
        let grand_total = self.grand_total();
        let advance_total = self.advance_total();
        LedgerSummary {
            transaction_count: self.transactions.len(),
            payment_count: self.payments.len(),
            grand_total,
            advance_total,
            due: grand_total - advance_total,
        }
    }
}

//! Sale and payment rows, the pricing model and ledger aggregates.

pub mod coerce;
pub mod dates;
pub mod ids;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod payment;
pub mod pricing;
pub mod transaction;

pub use coerce::ValidationMode;
pub use ids::{IdScheme, IdSource, SequentialIds, UuidIds};
pub use ledger::{Ledger, LedgerSummary};
pub use payment::{Payment, PaymentField};
pub use pricing::{Branch, RateType, DEFAULT_TRANSPORT, TRANSPORT_BRANCHES};
pub use transaction::{Transaction, TransactionField};

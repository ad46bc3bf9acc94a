#![doc(test(attr(deny(warnings))))]

//! Fish sale bookkeeping: per-row pricing with branch transport fees, advance
//! payments and the running balance due, persisted to a key-value store and
//! exchanged as CSV. The `cli` module wraps it in a small shell.

pub mod cli;
pub mod config;
pub mod errors;
pub mod format;
pub mod interchange;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fish ledger tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

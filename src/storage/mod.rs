pub mod json_backend;
pub mod ledger_store;
pub mod memory;

use crate::errors::Result;

/// Durable string blobs addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Overwrites any prior value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use ledger_store::{CollectionName, LedgerStore, PAYMENTS_KEY, TRANSACTIONS_KEY};
pub use memory::MemoryStore;

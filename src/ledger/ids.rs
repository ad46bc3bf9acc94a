use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

/// Source of opaque row identifiers, owned by whoever owns the ledger.
pub trait IdSource: Send + fmt::Debug {
    fn next_id(&mut self) -> String;

    /// Called for every id already present (e.g. after loading) so it is
    /// never handed out again.
    fn observe(&mut self, _existing: &str) {}
}

/// Monotonic `tx_<n>` identifiers. Once the counter space is used up,
/// ids switch to `<prefix><uuid>`, which never parse back as a number.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    /// `None` once `u64::MAX` has been handed out or observed.
    next: Option<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::with_prefix("tx_")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Some(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        match self.next {
            Some(current) => {
                self.next = current.checked_add(1);
                format!("{}{}", self.prefix, current)
            }
            None => format!("{}{}", self.prefix, Uuid::new_v4().simple()),
        }
    }

    fn observe(&mut self, existing: &str) {
        let Some(next) = self.next else {
            return;
        };
        let seen = existing
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.parse::<u64>().ok());
        if let Some(seen) = seen.filter(|seen| *seen >= next) {
            self.next = seen.checked_add(1);
            if self.next.is_none() {
                tracing::warn!(id = existing, "sequential ids exhausted, using uuids");
            }
        }
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    #[default]
    Sequential,
    Uuid,
}

impl IdScheme {
    pub fn build(self) -> Box<dyn IdSource> {
        match self {
            IdScheme::Sequential => Box::new(SequentialIds::new()),
            IdScheme::Uuid => Box::new(UuidIds),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdScheme::Sequential => f.write_str("sequential"),
            IdScheme::Uuid => f.write_str("uuid"),
        }
    }
}

impl FromStr for IdScheme {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(IdScheme::Sequential),
            "uuid" => Ok(IdScheme::Uuid),
            other => Err(LedgerError::Config(format!(
                "unknown id scheme `{other}` (use sequential or uuid)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_skip_observed_values() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "tx_1");
        ids.observe("tx_41");
        ids.observe("tx_7");
        ids.observe("tx_1700000000000_3");
        assert_eq!(ids.next_id(), "tx_42");
    }

    #[test]
    fn counter_exhaustion_falls_back_to_uuids() {
        let mut ids = SequentialIds::new();
        ids.observe("tx_18446744073709551615");
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first, "tx_18446744073709551615");
        assert_ne!(first, second);
        assert!(first.starts_with("tx_"));

        ids.observe("tx_5");
        let later = ids.next_id();
        assert!(later["tx_".len()..].parse::<u64>().is_err());
    }

    #[test]
    fn last_counter_value_is_issued_once() {
        let mut ids = SequentialIds::new();
        ids.observe("tx_18446744073709551614");
        assert_eq!(ids.next_id(), "tx_18446744073709551615");
        assert_ne!(ids.next_id(), "tx_18446744073709551615");
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}

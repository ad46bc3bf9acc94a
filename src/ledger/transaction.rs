use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

use super::{
    coerce::{coerce_number, ValidationMode},
    dates::{self, parse_date},
    pricing::{self, Branch, RateType},
};

/// One sale line item. `price` and `total` are derived and refreshed on
/// every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(with = "dates::flexible")]
    pub date: NaiveDate,
    #[serde(default)]
    pub branch: Branch,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub rate_type: RateType,
    #[serde(default)]
    pub transport: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total: f64,
}

impl Transaction {
    /// Builds a row whose transport starts at the branch default.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        branch: Branch,
        size: f64,
        rate_type: RateType,
    ) -> Self {
        let mut txn = Self {
            id: id.into(),
            date,
            branch,
            size,
            rate_type,
            transport: branch.default_transport(),
            price: 0.0,
            total: 0.0,
        };
        txn.refresh();
        txn
    }

    pub fn rate(&self) -> f64 {
        self.rate_type.rate()
    }

    /// Transport as it counts towards `total`.
    pub fn effective_transport(&self) -> f64 {
        pricing::transport_contribution(self.branch, self.transport)
    }

    pub fn computed_price(&self) -> f64 {
        pricing::price(self.size, self.rate_type)
    }

    pub fn computed_total(&self) -> f64 {
        pricing::row_total(self.size, self.rate_type, self.branch, self.transport)
    }

    pub fn refresh(&mut self) {
        self.price = self.computed_price();
        self.total = self.computed_total();
    }

    /// Applies one raw field edit and refreshes the derived values. Returns
    /// whether the row changed.
    pub fn apply(
        &mut self,
        field: TransactionField,
        raw: &str,
        mode: ValidationMode,
    ) -> Result<bool> {
        match field {
            TransactionField::Date => match parse_date(raw) {
                Some(date) => self.date = date,
                None if mode == ValidationMode::Strict => {
                    return Err(LedgerError::InvalidValue {
                        field: "date",
                        value: raw.trim().to_string(),
                    })
                }
                None => {
                    tracing::warn!(id = %self.id, raw, "ignoring unparseable date");
                    return Ok(false);
                }
            },
            TransactionField::Branch => match raw.parse::<Branch>() {
                Ok(branch) => {
                    self.branch = branch;
                    self.transport = branch.default_transport();
                }
                Err(err) if mode == ValidationMode::Strict => return Err(err),
                Err(_) => {
                    tracing::warn!(id = %self.id, raw, "ignoring unknown branch");
                    return Ok(false);
                }
            },
            TransactionField::Size => self.size = coerce_number("size", raw, mode)?,
            TransactionField::RateType => {
                self.rate_type = match mode {
                    ValidationMode::Strict => raw.parse::<RateType>()?,
                    ValidationMode::Lenient => RateType::from_label(raw.trim()),
                }
            }
            TransactionField::Transport => {
                self.transport = coerce_number("transport", raw, mode)?
            }
        }
        self.refresh();
        Ok(true)
    }
}

/// Editable transaction fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Date,
    Branch,
    Size,
    RateType,
    Transport,
}

impl FromStr for TransactionField {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(TransactionField::Date),
            "branch" => Ok(TransactionField::Branch),
            "size" => Ok(TransactionField::Size),
            "ratetype" | "rate_type" | "rate-type" | "rate" => Ok(TransactionField::RateType),
            "transport" => Ok(TransactionField::Transport),
            other => Err(LedgerError::InvalidValue {
                field: "transaction field",
                value: other.to_string(),
            }),
        }
    }
}

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

use super::{
    coerce::{coerce_number, ValidationMode},
    dates::{self, parse_date},
};

/// An advance received from the customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    #[serde(with = "dates::flexible")]
    pub date: NaiveDate,
    #[serde(default)]
    pub amount: f64,
}

impl Payment {
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: f64) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
        }
    }

    pub fn apply(&mut self, field: PaymentField, raw: &str, mode: ValidationMode) -> Result<bool> {
        match field {
            PaymentField::Date => match parse_date(raw) {
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
            PaymentField::Amount => self.amount = coerce_number("amount", raw, mode)?,
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    Date,
    Amount,
}

impl FromStr for PaymentField {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(PaymentField::Date),
            "amount" => Ok(PaymentField::Amount),
            other => Err(LedgerError::InvalidValue {
                field: "payment field",
                value: other.to_string(),
            }),
        }
    }
}

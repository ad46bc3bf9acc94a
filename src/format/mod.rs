//! Presentation rules shared by the shell and CSV export.

use serde::{Deserialize, Serialize};

pub use crate::ledger::dates::display_date;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

/// Rounds half away from zero and renders without grouping or currency
/// symbol, e.g. `1234.5` as `1235`.
pub fn format_amount(value: f64, style: NegativeStyle) -> String {
    let rounded = value.round();
    if rounded < 0.0 {
        let body = format!("{:.0}", rounded.abs());
        match style {
            NegativeStyle::Sign => format!("-{}", body),
            NegativeStyle::Parentheses => format!("({})", body),
        }
    } else {
        format!("{:.0}", rounded.abs())
    }
}

/// Balance due: an overpayment shows as the magnitude in parentheses.
pub fn format_due(due: f64) -> String {
    format_amount(due, NegativeStyle::Parentheses)
}

/// Shortest decimal text that reads back to the same number (`60`, `6.6`,
/// `66.00000000000001`); never `-0`.
pub fn plain_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// How free-form numeric input is turned into numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Unparseable input silently becomes `0`.
    #[default]
    Lenient,
    /// Unparseable, negative or non-finite input is rejected.
    Strict,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Lenient => f.write_str("lenient"),
            ValidationMode::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(ValidationMode::Lenient),
            "strict" => Ok(ValidationMode::Strict),
            other => Err(LedgerError::Config(format!(
                "unknown validation mode `{other}` (use lenient or strict)"
            ))),
        }
    }
}

/// Converts raw field input into a number according to `mode`.
///
/// Blank input is `0` in both modes.
pub fn coerce_number(field: &'static str, raw: &str, mode: ValidationMode) -> Result<f64> {
    match mode {
        ValidationMode::Lenient => Ok(lenient_number(raw)),
        ValidationMode::Strict => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            match trimmed.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
                _ => Err(LedgerError::InvalidValue {
                    field,
                    value: trimmed.to_string(),
                }),
            }
        }
    }
}

/// Longest-numeric-prefix parse that falls back to `0`: `"12kg"` is 12,
/// `"abc"` is 0.
pub fn lenient_number(raw: &str) -> f64 {
    parse_numeric_prefix(raw)
        .filter(|value| value.is_finite() && *value != 0.0)
        .unwrap_or(0.0)
}

fn parse_numeric_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut idx: usize| {
        while idx < len && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        idx
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        let frac_count = frac_end - (end + 1);
        if frac_count > 0 {
            digit_count += frac_count;
            end = frac_end;
        }
    }
    if digit_count == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_reads_numeric_prefix() {
        assert_eq!(lenient_number("12.5"), 12.5);
        assert_eq!(lenient_number("  7kg"), 7.0);
        assert_eq!(lenient_number(".5"), 0.5);
        assert_eq!(lenient_number("5."), 5.0);
        assert_eq!(lenient_number("-3"), -3.0);
        assert_eq!(lenient_number("2e2x"), 200.0);
        assert_eq!(lenient_number("4e"), 4.0);
    }

    #[test]
    fn lenient_falls_back_to_zero() {
        assert_eq!(lenient_number("abc"), 0.0);
        assert_eq!(lenient_number(""), 0.0);
        assert_eq!(lenient_number("-"), 0.0);
        assert_eq!(lenient_number("."), 0.0);
        assert!(lenient_number("-0").is_sign_positive());
        assert_eq!(lenient_number("1e999"), 0.0);
    }

    #[test]
    fn strict_rejects_garbage_and_negatives() {
        let mode = ValidationMode::Strict;
        assert_eq!(coerce_number("size", " 4.25 ", mode).unwrap(), 4.25);
        assert_eq!(coerce_number("size", "", mode).unwrap(), 0.0);
        assert!(matches!(
            coerce_number("size", "12kg", mode),
            Err(LedgerError::InvalidValue { field: "size", .. })
        ));
        assert!(coerce_number("amount", "-1", mode).is_err());
        assert!(coerce_number("amount", "NaN", mode).is_err());
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Flat fee added to every sale shipped from a transport-eligible branch.
pub const DEFAULT_TRANSPORT: f64 = 500.0;

/// Branches whose sales carry a transport fee.
pub const TRANSPORT_BRANCHES: [Branch; 2] = [Branch::Khulna, Branch::Shylet];

/// Sale location. The first variant is the default for new rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Branch {
    #[default]
    Khulna,
    Bashundhara,
    Shylet,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Khulna, Branch::Bashundhara, Branch::Shylet];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Khulna => "Khulna",
            Branch::Bashundhara => "Bashundhara",
            Branch::Shylet => "Shylet",
        }
    }

    pub fn is_transport_eligible(self) -> bool {
        TRANSPORT_BRANCHES.contains(&self)
    }

    /// Transport fee a freshly created or re-branched row starts with.
    pub fn default_transport(self) -> f64 {
        if self.is_transport_eligible() {
            DEFAULT_TRANSPORT
        } else {
            0.0
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Branch::ALL
            .into_iter()
            .find(|branch| branch.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LedgerError::InvalidValue {
                field: "branch",
                value: trimmed.to_string(),
            })
    }
}

/// Pricing tier selecting the per-kilogram rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RateType {
    #[default]
    Small,
    Big,
}

impl RateType {
    pub fn as_str(self) -> &'static str {
        match self {
            RateType::Small => "Small",
            RateType::Big => "Big",
        }
    }

    /// Currency per kilogram.
    pub fn rate(self) -> f64 {
        match self {
            RateType::Small => 6.0,
            RateType::Big => 6.6,
        }
    }

    /// Anything other than an exact `Big` is priced as `Small`.
    pub fn from_label(label: &str) -> Self {
        if label == "Big" {
            RateType::Big
        } else {
            RateType::Small
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Small" => Ok(RateType::Small),
            "Big" => Ok(RateType::Big),
            other => Err(LedgerError::InvalidValue {
                field: "rateType",
                value: other.to_string(),
            }),
        }
    }
}

/// `size * rate`; negative sizes multiply through.
pub fn price(size: f64, rate_type: RateType) -> f64 {
    size * rate_type.rate()
}

/// The part of `transport` that counts towards a row total.
pub fn transport_contribution(branch: Branch, transport: f64) -> f64 {
    if branch.is_transport_eligible() {
        transport
    } else {
        0.0
    }
}

pub fn row_total(size: f64, rate_type: RateType, branch: Branch, transport: f64) -> f64 {
    price(size, rate_type) + transport_contribution(branch, transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_fixed() {
        assert_eq!(price(10.0, RateType::Small), 60.0);
        assert!((price(10.0, RateType::Big) - 66.0).abs() < 1e-9);
        assert_eq!(price(-2.0, RateType::Small), -12.0);
    }

    #[test]
    fn only_khulna_and_shylet_pay_transport() {
        assert_eq!(row_total(10.0, RateType::Small, Branch::Khulna, 500.0), 560.0);
        assert_eq!(row_total(10.0, RateType::Small, Branch::Shylet, 250.0), 310.0);
        assert_eq!(
            row_total(10.0, RateType::Small, Branch::Bashundhara, 500.0),
            60.0
        );
        assert_eq!(Branch::Bashundhara.default_transport(), 0.0);
        assert_eq!(Branch::Shylet.default_transport(), DEFAULT_TRANSPORT);
    }

    #[test]
    fn branch_parsing_ignores_case_but_rejects_unknown() {
        assert_eq!("shylet".parse::<Branch>().unwrap(), Branch::Shylet);
        assert_eq!(" Khulna ".parse::<Branch>().unwrap(), Branch::Khulna);
        assert!("Dhaka".parse::<Branch>().is_err());
    }

    #[test]
    fn rate_label_normalisation_is_exact() {
        assert_eq!(RateType::from_label("Big"), RateType::Big);
        assert_eq!(RateType::from_label("big"), RateType::Small);
        assert_eq!(RateType::from_label(""), RateType::Small);
    }
}

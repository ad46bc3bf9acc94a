use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    interchange::CsvDialect,
    ledger::{Branch, IdScheme, ValidationMode},
    utils::{
        paths::{app_data_dir, config_file_in, ensure_dir},
        persistence::write_atomic,
    },
};

/// User preferences. Pricing constants are deliberately absent: rates,
/// branches and the transport fee are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    /// Branch given to rows created by `add-tx` without an argument.
    pub default_branch: Branch,
    pub validation: ValidationMode,
    pub csv_dialect: CsvDialect,
    /// Takes effect the next time the ledger is opened.
    pub id_scheme: IdScheme,
}

impl Config {
    pub const KEYS: [&'static str; 4] =
        ["default_branch", "validation", "csv_dialect", "id_scheme"];

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "default_branch" => self.default_branch = value.parse()?,
            "validation" => self.validation = value.parse()?,
            "csv_dialect" => self.csv_dialect = value.parse()?,
            "id_scheme" => self.id_scheme = value.parse()?,
            other => {
                return Err(LedgerError::Config(format!(
                    "unknown setting `{other}` (expected one of {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("default_branch", self.default_branch.to_string()),
            ("validation", self.validation.to_string()),
            ("csv_dialect", self.csv_dialect.to_string()),
            ("id_scheme", self.id_scheme.to_string()),
        ]
    }
}

/// Loads and saves `config.json` inside the data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Defaults when the file does not exist yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

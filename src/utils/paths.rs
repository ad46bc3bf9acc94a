use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "FISH_LEDGER_HOME";

const DEFAULT_DIR_NAME: &str = ".fish_ledger";
const STORE_DIR: &str = "store";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.fish_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the key-value blobs under `base`.
pub fn store_dir_in(base: &Path) -> PathBuf {
    base.join(STORE_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_config_live_under_base() {
        let base = Path::new("/tmp/fish");
        assert_eq!(store_dir_in(base), PathBuf::from("/tmp/fish/store"));
        assert_eq!(config_file_in(base), PathBuf::from("/tmp/fish/config.json"));
    }
}

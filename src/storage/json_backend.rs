use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::Result,
    utils::{paths::ensure_dir, persistence::write_atomic},
};

use super::KeyValueStore;

const BLOB_EXTENSION: &str = "json";

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), BLOB_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        write_atomic(&self.blob_path(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.blob_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Keeps keys usable as file names: anything outside `[A-Za-z0-9_-]`
/// becomes `_`.
fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "blob".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(temp.path().join("store")).expect("json store");
        (store, temp)
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        assert_eq!(store.get("fishPayments").unwrap(), None);
        store.set("fishPayments", "[]").unwrap();
        assert_eq!(store.get("fishPayments").unwrap().as_deref(), Some("[]"));
        assert!(store.blob_path("fishPayments").ends_with("fishPayments.json"));
        store.remove("fishPayments").unwrap();
        store.remove("fishPayments").unwrap();
        assert_eq!(store.get("fishPayments").unwrap(), None);
    }

    #[test]
    fn keys_cannot_escape_the_root() {
        assert_eq!(canonical_key("../etc/passwd"), "___etc_passwd");
        assert_eq!(canonical_key("///"), "blob");
    }
}

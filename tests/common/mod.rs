#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use fish_ledger::{
    ledger::{Ledger, SequentialIds},
    storage::{JsonFileStore, LedgerStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// A file-backed store rooted in its own temp directory.
pub fn setup_store() -> (LedgerStore, PathBuf) {
    let root = temp_base().join("store");
    let backend = JsonFileStore::new(&root).expect("create json file store");
    (LedgerStore::new(Box::new(backend)), root)
}

pub fn empty_ledger() -> Ledger {
    Ledger::new(Box::new(SequentialIds::new()))
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

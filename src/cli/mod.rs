//! Interactive and scripted shell over the ledger.

pub mod commands;
pub mod core;
mod help;
mod io;
pub mod output;
mod shell;
mod view;

pub use shell::run_cli;

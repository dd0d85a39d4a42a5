//! A personal expense tracker: an ordered ledger of expenses persisted as JSON, with spending
//! totals broken down by category and payment method.
//!
//! The core is `model::Ledger`, which performs no I/O, and `LedgerStore`, which reads and writes
//! a ledger file. The remaining modules back the `expenses` CLI.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod model;
mod store;
mod utils;

pub use backup::Backup;
pub use config::Config;
pub use error::LedgerError;
pub use error::Result;
pub use store::LedgerStore;

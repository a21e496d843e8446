//! A daily cash ledger for motorcycle-taxi drivers.
//!
//! The engine lives in [`ledger`]: it reconciles rides, expenses and credit collections into
//! per-day cash summaries over any [`store::Store`]. The [`commands`] module is the CLI surface
//! built on top of it.

pub mod args;
pub mod calc;
pub mod clock;
pub mod commands;
mod config;
mod db;
mod error;
pub mod ledger;
pub mod model;
pub mod store;
mod utils;


pub use config::Config;
pub use db::Db;
pub use error::{Error, ErrorType, LedgerError, LedgerResult, Result};
pub use ledger::Ledger;
pub use store::{MemoryStore, Store};

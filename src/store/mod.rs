//! The record store consumed by the ledger.
//!
//! `Store` is the durable, keyed storage for `Day`, `Ride` and `Expense` records. Every write is
//! a single upsert of one complete record. Implementations must surface their failures instead
//! of returning empty results.
//!
//! - `Db` (see `crate::db`) keeps records in SQLite.
//! - `MemoryStore` keeps them in memory. It is compiled in the production build so the whole
//!   ledger can be run without a database file.

mod memory;

pub use memory::MemoryStore;

use crate::model::{Day, Expense, Ride};
use crate::Result;
use chrono::NaiveDate;

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Returns the day for `date`, if one was started.
    async fn get_day(&self, date: NaiveDate) -> Result<Option<Day>>;

    /// Inserts or replaces the day keyed by its date.
    async fn put_day(&self, day: &Day) -> Result<()>;

    /// Returns the ride with `id`, if it exists.
    async fn get_ride(&self, id: &str) -> Result<Option<Ride>>;

    /// Returns the rides performed on `date`.
    async fn get_rides_by_date(&self, date: NaiveDate) -> Result<Vec<Ride>>;

    /// Returns the credit rides, of any date, that were collected on `date`.
    async fn get_rides_by_paid_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>>;

    /// Returns every credit ride that is still pending, across all dates.
    async fn get_all_pending_credit_rides(&self) -> Result<Vec<Ride>>;

    /// Inserts or replaces the ride keyed by its id.
    async fn put_ride(&self, ride: &Ride) -> Result<()>;

    /// Returns the expenses recorded on `date`.
    async fn get_expenses_by_date(&self, date: NaiveDate) -> Result<Vec<Expense>>;

    /// Inserts or replaces the expense keyed by its id.
    async fn put_expense(&self, expense: &Expense) -> Result<()>;
}

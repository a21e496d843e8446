//! Types that represent the ledger records: `Day`, `Ride` and `Expense`, and the `Amount` they
//! are measured in.
mod amount;
mod day;
mod expense;
mod ride;

pub use amount::{Amount, AmountError};
pub use day::{Day, DayState};
pub use expense::{Expense, ExpenseCategory};
pub use ride::{PaymentMethod, Ride, RideStatus};

use uuid::Uuid;

const RIDE_ID_PREFIX: &str = "r";
const EXPENSE_ID_PREFIX: &str = "e";

/// Generates a unique id for a new ride, e.g. `r-9f0c0b8e...`.
pub(crate) fn new_ride_id() -> String {
    generate_id(RIDE_ID_PREFIX)
}

/// Generates a unique id for a new expense, e.g. `e-41d2a7c3...`.
pub(crate) fn new_expense_id() -> String {
    generate_id(EXPENSE_ID_PREFIX)
}

fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

//! Command handlers for the mototaxi CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod calc;
mod credit;
mod day;
mod init;
mod records;

use crate::clock::format_time_12h;
use crate::model::{Expense, Ride};
use crate::Config;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use calc::calc;
pub use credit::{collect, outstanding};
pub use day::{close_day, start_day, summary};
pub use init::init;
pub use records::{record_expense, record_ride, records};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// The business date a command acts on: the `--date` override, or today.
fn business_date(config: &Config, date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| config.clock().today())
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// One display line for a ride, e.g. `2:30 PM  $3.000  credit (pending)  r-5c1e...  Don Luis`.
fn ride_line(ride: &Ride) -> String {
    let method = if ride.is_credit() {
        format!("{} ({})", ride.payment_method(), ride.status())
    } else {
        ride.payment_method().to_string()
    };
    line(
        ride.recorded_at(),
        &ride.amount().to_string(),
        &method,
        ride.id(),
        ride.note(),
    )
}

fn expense_line(expense: &Expense) -> String {
    line(
        expense.recorded_at(),
        &expense.amount().to_string(),
        &expense.category().to_string(),
        expense.id(),
        expense.note(),
    )
}

fn line(
    time: chrono::DateTime<chrono::FixedOffset>,
    amount: &str,
    kind: &str,
    id: &str,
    note: &str,
) -> String {
    format!(
        "{:>8}  {amount:>10}  {kind:<18}  {id}  {note}",
        format_time_12h(time)
    )
    .trim_end()
    .to_string()
}

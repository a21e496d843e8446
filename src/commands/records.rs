//! Record command handlers: rides, expenses and the day's record list.

use crate::args::{ExpenseArgs, RecordsArgs, RideArgs};
use crate::commands::{business_date, expense_line, plural, ride_line, Out};
use crate::error::{IntoLedgerResult, LedgerError, LedgerResult};
use crate::ledger::{Entry, Ledger, NewExpense, NewRide};
use crate::model::{DayState, Expense, Ride};
use crate::store::Store;
use crate::{Config, Result};
use chrono::NaiveDate;

/// Records a ride for the day.
///
/// # Errors
/// - Returns an error if no day was started for the date, the amount is not positive or the
///   payment method is missing.
pub async fn record_ride(config: Config, args: RideArgs) -> Result<Out<Ride>> {
    let date = business_date(&config, args.date());
    let ledger = config.ledger();
    require_day(&ledger, date).await?;
    let ride = ledger
        .record_ride(NewRide {
            date,
            amount: args.amount(),
            payment_method: args.method(),
            note: args.note().map(str::to_string),
            recorded_at: config.clock().now(),
        })
        .await
        .ledger_result()?;
    let message = if ride.is_credit() {
        format!(
            "Recorded a {} ride on credit ({}); it counts once it is collected",
            ride.amount(),
            ride.id()
        )
    } else {
        format!(
            "Recorded a {} ride paid by {}",
            ride.amount(),
            ride.payment_method()
        )
    };
    Ok(Out::new(message, ride))
}

/// Records an expense for the day.
///
/// # Errors
/// - Returns an error if no day was started for the date, the amount is not positive or the
///   category is missing.
pub async fn record_expense(config: Config, args: ExpenseArgs) -> Result<Out<Expense>> {
    let date = business_date(&config, args.date());
    let ledger = config.ledger();
    require_day(&ledger, date).await?;
    let expense = ledger
        .record_expense(NewExpense {
            date,
            amount: args.amount(),
            category: args.category(),
            note: args.note().map(str::to_string),
            recorded_at: config.clock().now(),
        })
        .await
        .ledger_result()?;
    let message = format!(
        "Recorded a {} expense for {}",
        expense.amount(),
        expense.category()
    );
    Ok(Out::new(message, expense))
}

/// Lists the day's rides, collections and expenses under a filter.
pub async fn records(config: Config, args: RecordsArgs) -> Result<Out<Vec<Entry>>> {
    let date = business_date(&config, args.date());
    let entries = config
        .ledger()
        .filtered_records(date, args.filter())
        .await
        .ledger_result()?;
    let mut message = format!(
        "{} for {date} ({})",
        plural(entries.len(), "record", "records"),
        args.filter()
    );
    for entry in &entries {
        let line = match entry {
            Entry::Ride(ride) => ride_line(ride),
            Entry::Collection(ride) => format!("{}  collected", ride_line(ride)),
            Entry::Expense(expense) => expense_line(expense),
        };
        message.push_str("\n  ");
        message.push_str(&line);
    }
    Ok(Out::new(message, entries))
}

/// Recording is only offered once the day has been started.
async fn require_day<S: Store>(ledger: &Ledger<S>, date: NaiveDate) -> Result<()> {
    let state = ledger.day_state(date).await.ledger_result()?;
    let started: LedgerResult<()> = match state {
        DayState::NoDay => Err(LedgerError::conflict(format!(
            "no day has been started for {date}, run 'mototaxi start' first"
        ))),
        DayState::Open | DayState::Closed => Ok(()),
    };
    started.ledger_result()
}

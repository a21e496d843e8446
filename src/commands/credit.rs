//! Credit ("fiada") command handlers.

use crate::args::CollectArgs;
use crate::commands::{business_date, plural, ride_line, Out};
use crate::error::{IntoLedgerResult, LedgerError};
use crate::model::{Amount, Ride};
use crate::{Config, Result};

/// Marks a ride given on credit as paid on the day. The fare counts as income of that day.
///
/// # Errors
/// - Returns an error if the ride does not exist, was not given on credit or was already
///   collected.
pub async fn collect(config: Config, args: CollectArgs) -> Result<Out<Ride>> {
    let date = business_date(&config, args.date());
    let ride = config
        .ledger()
        .collect_credit(args.ride_id(), date)
        .await
        .ledger_result()?;
    let message = format!(
        "Collected {} for the ride of {}; it counts as income of {date}",
        ride.amount(),
        ride.date()
    );
    Ok(Out::new(message, ride))
}

/// Lists every ride given on credit that has not been collected, from any day.
pub async fn outstanding(config: Config) -> Result<Out<Vec<Ride>>> {
    let rides = config
        .ledger()
        .list_outstanding()
        .await
        .ledger_result()?;
    if rides.is_empty() {
        return Ok(Out::new("Nothing is owed", rides));
    }
    let total = Amount::checked_sum(rides.iter().map(Ride::amount))
        .ok_or_else(|| LedgerError::validation("the outstanding credit is too large to add up"))
        .ledger_result()?;
    let mut message = format!(
        "{} on credit, {total} owed",
        plural(rides.len(), "ride", "rides")
    );
    for ride in &rides {
        message.push_str(&format!("\n  {}  {}", ride.date(), ride_line(ride)));
    }
    Ok(Out::new(message, rides))
}

//! The daily ledger engine.
//!
//! `Ledger` turns the rides, expenses and credit collections held by a `Store` into per-day cash
//! summaries, a cross-day view of outstanding credit, and the day lifecycle
//! (`NoDay -> Open -> Closed`). Every operation is keyed by an explicit date; there is no notion
//! of a current day inside the engine.
//!
//! Each mutation validates first and then writes exactly one record, so a failed operation never
//! leaves anything partially written.

mod filter;
mod lifecycle;
mod records;
mod summary;

pub use filter::{Entry, RecordFilter};
pub use lifecycle::Closing;
pub use records::{NewExpense, NewRide};
pub use summary::DaySummary;

use crate::error::{LedgerError, LedgerResult};
use crate::model::{Amount, Day, DayState, Expense, Ride};
use crate::store::Store;
use chrono::NaiveDate;
use tracing::{debug, warn};

/// The ledger engine over a record store.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get_day(&self, date: NaiveDate) -> LedgerResult<Option<Day>> {
        Ok(self.store.get_day(date).await?)
    }

    pub async fn day_state(&self, date: NaiveDate) -> LedgerResult<DayState> {
        Ok(DayState::from(self.get_day(date).await?.as_ref()))
    }

    /// Starts the day for `date` with `opening_cash`.
    ///
    /// # Errors
    /// - `Validation` if `opening_cash` is not positive or is too large
    /// - `StateConflict` if the date already has a day, open or closed
    pub async fn start_day(&self, date: NaiveDate, opening_cash: Amount) -> LedgerResult<Day> {
        records::check_amount(opening_cash, "opening cash")?;
        if let Some(existing) = self.store.get_day(date).await? {
            return Err(LedgerError::conflict(format!(
                "the day {date} was already started and is {}",
                existing.state()
            )));
        }
        let day = Day::new(date, opening_cash);
        self.store.put_day(&day).await?;
        debug!("Started day {date} with opening cash {opening_cash}");
        Ok(day)
    }

    /// Closes the open day for `date`, recording the savings withdrawal.
    ///
    /// A missing or negative `savings_withdrawal` is recorded as 0. Closing does not stop
    /// further rides or expenses from being recorded for the date.
    ///
    /// # Errors
    /// - `StateConflict` if there is no day for `date` or it is already closed
    /// - `Validation` if the savings withdrawal or the day's totals are too large
    pub async fn close_day(
        &self,
        date: NaiveDate,
        savings_withdrawal: Option<i64>,
    ) -> LedgerResult<Closing> {
        let day = self.open_day(date).await?;
        let savings = lifecycle::coerce_savings(savings_withdrawal)?;
        let open_summary = self.summarize_day(&day).await?;
        let total_before_savings = open_summary.cash_on_hand;
        let cash_after_savings = total_before_savings.checked_sub(savings).ok_or_else(|| {
            LedgerError::validation(format!("the cash after savings of {date} is too large"))
        })?;

        let closed = day.into_closed(savings);
        self.store.put_day(&closed).await?;
        debug!("Closed day {date}: total {total_before_savings}, savings {savings}");

        let summary = DaySummary {
            closed: closed.is_closed(),
            savings_withdrawal: closed.savings_withdrawal(),
            ..open_summary
        };
        Ok(Closing {
            summary,
            total_before_savings,
            cash_after_savings,
            day: closed,
        })
    }

    /// Validates and stores a ride.
    pub async fn record_ride(&self, new_ride: NewRide) -> LedgerResult<Ride> {
        let ride = new_ride.validate()?;
        self.note_day_state(ride.date()).await?;
        self.store.put_ride(&ride).await?;
        debug!(
            "Recorded ride {} of {} paid by {}",
            ride.id(),
            ride.amount(),
            ride.payment_method()
        );
        Ok(ride)
    }

    /// Validates and stores an expense.
    pub async fn record_expense(&self, new_expense: NewExpense) -> LedgerResult<Expense> {
        let expense = new_expense.validate()?;
        self.note_day_state(expense.date()).await?;
        self.store.put_expense(&expense).await?;
        debug!(
            "Recorded expense {} of {} for {}",
            expense.id(),
            expense.amount(),
            expense.category()
        );
        Ok(expense)
    }

    /// Marks the pending credit ride `ride_id` as paid on `date`. The fare becomes income of
    /// `date`, not of the ride's own date.
    ///
    /// # Errors
    /// - `NotFound` if there is no ride with that id
    /// - `StateConflict` if the ride is not a credit ride or was already collected
    pub async fn collect_credit(&self, ride_id: &str, date: NaiveDate) -> LedgerResult<Ride> {
        let mut ride = self
            .store
            .get_ride(ride_id)
            .await?
            .ok_or_else(|| LedgerError::not_found(format!("there is no ride with id {ride_id}")))?;
        ride.collect(date)?;
        self.store.put_ride(&ride).await?;
        debug!(
            "Collected {} for ride {} of {} on {date}",
            ride.amount(),
            ride.id(),
            ride.date()
        );
        Ok(ride)
    }

    /// Computes the cash summary of `date`. Returns `None` when no day was started for the date,
    /// which is distinct from a day without activity.
    pub async fn summarize(&self, date: NaiveDate) -> LedgerResult<Option<DaySummary>> {
        match self.store.get_day(date).await? {
            Some(day) => Ok(Some(self.summarize_day(&day).await?)),
            None => Ok(None),
        }
    }

    /// Lists every credit ride that has not been collected, across all dates.
    pub async fn list_outstanding(&self) -> LedgerResult<Vec<Ride>> {
        Ok(self.store.get_all_pending_credit_rides().await?)
    }

    /// Lists the records of `date` selected by `filter`.
    pub async fn filtered_records(
        &self,
        date: NaiveDate,
        filter: RecordFilter,
    ) -> LedgerResult<Vec<Entry>> {
        let rides = match filter {
            RecordFilter::Expenses => Vec::new(),
            _ => self.store.get_rides_by_date(date).await?,
        };
        let collected = match filter {
            RecordFilter::All | RecordFilter::Payments => {
                self.store.get_rides_by_paid_on_date(date).await?
            }
            _ => Vec::new(),
        };
        let expenses = match filter {
            RecordFilter::All | RecordFilter::Expenses => {
                self.store.get_expenses_by_date(date).await?
            }
            _ => Vec::new(),
        };
        Ok(filter::select(date, filter, rides, collected, expenses))
    }

    async fn summarize_day(&self, day: &Day) -> LedgerResult<DaySummary> {
        let date = day.date();
        let rides = self.store.get_rides_by_date(date).await?;
        let collected = self.store.get_rides_by_paid_on_date(date).await?;
        let expenses = self.store.get_expenses_by_date(date).await?;
        summary::summarize(day, &rides, &collected, &expenses)
    }

    async fn open_day(&self, date: NaiveDate) -> LedgerResult<Day> {
        match self.store.get_day(date).await? {
            Some(day) if !day.is_closed() => Ok(day),
            Some(_) => Err(LedgerError::conflict(format!(
                "the day {date} is already closed"
            ))),
            None => Err(LedgerError::conflict(format!(
                "the day {date} has not been started"
            ))),
        }
    }

    /// Records are accepted for any date. This only reports unusual cases.
    async fn note_day_state(&self, date: NaiveDate) -> LedgerResult<()> {
        match self.day_state(date).await? {
            DayState::Open => {}
            DayState::Closed => warn!("Recording against {date}, which is already closed"),
            DayState::NoDay => debug!("Recording against {date}, which has no day started"),
        }
        Ok(())
    }
}

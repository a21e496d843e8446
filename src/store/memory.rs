//! Implements the `Store` trait with in-memory data.

use crate::model::{Day, Expense, PaymentMethod, Ride, RideStatus};
use crate::store::Store;
use crate::Result;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::trace;

#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

/// An implementation of the `Store` trait that holds everything in memory.
///
/// Records are returned in insertion order. Rides are indexed by `(payment_method, status)` so
/// that listing pending credit rides does not scan every ride.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    #[cfg(test)]
    unavailable: AtomicBool,
}

#[derive(Debug, Default)]
struct Inner {
    days: BTreeMap<NaiveDate, Day>,
    rides: Vec<Ride>,
    ride_positions: HashMap<String, usize>,
    rides_by_kind: BTreeMap<(PaymentMethod, RideStatus), BTreeSet<usize>>,
    expenses: Vec<Expense>,
    expense_positions: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail, as a broken disk would.
    #[cfg(test)]
    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            anyhow::bail!("The in-memory store is unavailable");
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

impl Inner {
    fn rides_where<F>(&self, predicate: F) -> Vec<Ride>
    where
        F: Fn(&Ride) -> bool,
    {
        self.rides.iter().filter(|r| predicate(r)).cloned().collect()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get_day(&self, date: NaiveDate) -> Result<Option<Day>> {
        self.check()?;
        Ok(self.inner.read().await.days.get(&date).cloned())
    }

    async fn put_day(&self, day: &Day) -> Result<()> {
        self.check()?;
        trace!("put_day {}", day.date());
        self.inner
            .write()
            .await
            .days
            .insert(day.date(), day.clone());
        Ok(())
    }

    async fn get_ride(&self, id: &str) -> Result<Option<Ride>> {
        self.check()?;
        let inner = self.inner.read().await;
        Ok(inner
            .ride_positions
            .get(id)
            .map(|&position| inner.rides[position].clone()))
    }

    async fn get_rides_by_date(&self, date: NaiveDate) -> Result<Vec<Ride>> {
        self.check()?;
        Ok(self.inner.read().await.rides_where(|r| r.date() == date))
    }

    async fn get_rides_by_paid_on_date(&self, date: NaiveDate) -> Result<Vec<Ride>> {
        self.check()?;
        Ok(self
            .inner
            .read()
            .await
            .rides_where(|r| r.paid_on_date() == Some(date)))
    }

    async fn get_all_pending_credit_rides(&self) -> Result<Vec<Ride>> {
        self.check()?;
        let inner = self.inner.read().await;
        let pending: Vec<Ride> = inner
            .rides_by_kind
            .get(&(PaymentMethod::Credit, RideStatus::Pending))
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| inner.rides[position].clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(pending)
    }

    async fn put_ride(&self, ride: &Ride) -> Result<()> {
        self.check()?;
        trace!("put_ride {}", ride.id());
        let mut inner = self.inner.write().await;
        let kind = (ride.payment_method(), ride.status());
        let position = match inner.ride_positions.get(ride.id()).copied() {
            Some(position) => {
                let old = &inner.rides[position];
                let old_kind = (old.payment_method(), old.status());
                if let Some(positions) = inner.rides_by_kind.get_mut(&old_kind) {
                    positions.remove(&position);
                }
                inner.rides[position] = ride.clone();
                position
            }
            None => {
                let position = inner.rides.len();
                inner.rides.push(ride.clone());
                inner.ride_positions.insert(ride.id().to_string(), position);
                position
            }
        };
        inner.rides_by_kind.entry(kind).or_default().insert(position);
        Ok(())
    }

    async fn get_expenses_by_date(&self, date: NaiveDate) -> Result<Vec<Expense>> {
        self.check()?;
        let inner = self.inner.read().await;
        Ok(inner
            .expenses
            .iter()
            .filter(|e| e.date() == date)
            .cloned()
            .collect())
    }

    async fn put_expense(&self, expense: &Expense) -> Result<()> {
        self.check()?;
        trace!("put_expense {}", expense.id());
        let mut inner = self.inner.write().await;
        match inner.expense_positions.get(expense.id()).copied() {
            Some(position) => inner.expenses[position] = expense.clone(),
            None => {
                let position = inner.expenses.len();
                inner.expenses.push(expense.clone());
                inner
                    .expense_positions
                    .insert(expense.id().to_string(), position);
            }
        }
        Ok(())
    }
}

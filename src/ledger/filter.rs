use crate::model::{Expense, Ride};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which records of a day to list.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RecordFilter {
    /// Every ride, collection and expense of the day.
    #[default]
    All,
    /// Rides paid on the spot plus credit collections received on the day.
    Payments,
    Expenses,
    /// Credit rides of the day that have not been collected.
    Pending,
}

serde_plain::derive_display_from_serialize!(RecordFilter);
serde_plain::derive_fromstr_from_deserialize!(RecordFilter);

/// One line of a day's record list.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    /// A ride performed on the day.
    Ride(Ride),
    /// A credit ride, possibly from an earlier day, that was collected on the day.
    Collection(Ride),
    Expense(Expense),
}

impl Entry {
    pub fn ride(&self) -> Option<&Ride> {
        match self {
            Entry::Ride(r) | Entry::Collection(r) => Some(r),
            Entry::Expense(_) => None,
        }
    }

    pub fn expense(&self) -> Option<&Expense> {
        match self {
            Entry::Expense(e) => Some(e),
            _ => None,
        }
    }
}

/// Projects a day's records through `filter`, keeping the order rides, collections, expenses.
pub(super) fn select(
    date: NaiveDate,
    filter: RecordFilter,
    rides: Vec<Ride>,
    collected: Vec<Ride>,
    expenses: Vec<Expense>,
) -> Vec<Entry> {
    let rides = rides.into_iter().filter(|r| r.date() == date);
    let collected = collected
        .into_iter()
        .filter(|r| r.is_credit() && r.paid_on_date() == Some(date));
    let expenses = expenses.into_iter().filter(|e| e.date() == date);

    match filter {
        RecordFilter::All => rides
            .map(Entry::Ride)
            .chain(collected.map(Entry::Collection))
            .chain(expenses.map(Entry::Expense))
            .collect(),
        RecordFilter::Payments => rides
            .filter(Ride::is_paid_on_the_spot)
            .map(Entry::Ride)
            .chain(collected.map(Entry::Collection))
            .collect(),
        RecordFilter::Expenses => expenses.map(Entry::Expense).collect(),
        RecordFilter::Pending => rides
            .filter(Ride::is_outstanding)
            .map(Entry::Ride)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, ExpenseCategory, PaymentMethod};
    use chrono::{DateTime, FixedOffset};

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-18T11:00:00-04:00").unwrap()
    }

    fn ride(id: &str, d: u32, method: PaymentMethod) -> Ride {
        Ride::new(id, ymd(d), Amount::new(1000), method, "", at())
    }

    /// Day 18 has a cash ride, a pending credit ride, a collection of a ride from day 17 and an
    /// expense.
    fn records() -> (Vec<Ride>, Vec<Ride>, Vec<Expense>) {
        let mut old = ride("r-old", 17, PaymentMethod::Credit);
        old.collect(ymd(18)).unwrap();
        let rides = vec![
            ride("r-cash", 18, PaymentMethod::Cash),
            ride("r-fiada", 18, PaymentMethod::Credit),
        ];
        let expenses = vec![Expense::new(
            "e-food",
            ymd(18),
            Amount::new(800),
            ExpenseCategory::Food,
            "",
            at(),
        )];
        (rides, vec![old], expenses)
    }

    fn ids(filter: RecordFilter) -> Vec<String> {
        let (rides, collected, expenses) = records();
        select(ymd(18), filter, rides, collected, expenses)
            .iter()
            .map(|entry| match entry {
                Entry::Ride(r) => format!("ride:{}", r.id()),
                Entry::Collection(r) => format!("collection:{}", r.id()),
                Entry::Expense(e) => format!("expense:{}", e.id()),
            })
            .collect()
    }

    #[test]
    fn test_all() {
        assert_eq!(
            ids(RecordFilter::All),
            vec![
                "ride:r-cash",
                "ride:r-fiada",
                "collection:r-old",
                "expense:e-food"
            ]
        );
    }

    #[test]
    fn test_payments() {
        assert_eq!(
            ids(RecordFilter::Payments),
            vec!["ride:r-cash", "collection:r-old"]
        );
    }

    #[test]
    fn test_expenses() {
        assert_eq!(ids(RecordFilter::Expenses), vec!["expense:e-food"]);
    }

    #[test]
    fn test_pending() {
        assert_eq!(ids(RecordFilter::Pending), vec!["ride:r-fiada"]);
    }

    #[test]
    fn test_entry_serializes_with_kind() {
        let (rides, _, _) = records();
        let json = serde_json::to_value(Entry::Ride(rides[0].clone())).unwrap();
        assert_eq!(json["kind"], "ride");
        assert_eq!(json["id"], "r-cash");
        assert_eq!(json["amount"], 1000);
    }

    #[test]
    fn test_filter_strings() {
        assert_eq!(RecordFilter::Payments.to_string(), "payments");
        assert_eq!(
            "pending".parse::<RecordFilter>().unwrap(),
            RecordFilter::Pending
        );
        assert_eq!(RecordFilter::default(), RecordFilter::All);
    }
}

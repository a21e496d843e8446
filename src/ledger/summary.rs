use crate::error::{LedgerError, LedgerResult};
use crate::model::{Amount, Day, Expense, Ride};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The cash position of one day.
///
/// `cash_on_hand = opening_cash + real_income + collected_credit - expenses`. Credit rides that
/// are still pending are reported in `pending_credit` but do not count as cash.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub opening_cash: Amount,
    /// Rides performed on the date and paid on the spot.
    pub real_income: Amount,
    /// Credit rides from any date collected on this date.
    pub collected_credit: Amount,
    /// `real_income + collected_credit`.
    pub total_income: Amount,
    pub expenses: Amount,
    pub cash_on_hand: Amount,
    /// Credit rides performed on the date that have not been collected.
    pub pending_credit: Amount,
    pub closed: bool,
    pub savings_withdrawal: Amount,
}

/// Builds the summary of `day` from its rides, the rides collected on it and its expenses.
///
/// Records that do not belong to the day are ignored, so callers may pass wider sets.
///
/// # Errors
/// - `Validation` if the totals do not fit in an `Amount`
pub(super) fn summarize(
    day: &Day,
    rides: &[Ride],
    collected: &[Ride],
    expenses: &[Expense],
) -> LedgerResult<DaySummary> {
    let date = day.date();
    let overflow = || {
        LedgerError::validation(format!("the totals of {date} are too large to add up"))
    };
    let own_rides = || rides.iter().filter(move |r| r.date() == date);

    let real_income = Amount::checked_sum(
        own_rides()
            .filter(|r| r.is_paid_on_the_spot())
            .map(Ride::amount),
    )
    .ok_or_else(overflow)?;
    let pending_credit =
        Amount::checked_sum(own_rides().filter(|r| r.is_outstanding()).map(Ride::amount))
            .ok_or_else(overflow)?;
    let collected_credit = Amount::checked_sum(
        collected
            .iter()
            .filter(|r| r.is_credit() && r.paid_on_date() == Some(date))
            .map(Ride::amount),
    )
    .ok_or_else(overflow)?;
    let expenses = Amount::checked_sum(
        expenses
            .iter()
            .filter(|e| e.date() == date)
            .map(Expense::amount),
    )
    .ok_or_else(overflow)?;

    let total_income = real_income
        .checked_add(collected_credit)
        .ok_or_else(overflow)?;
    let cash_on_hand = day
        .opening_cash()
        .checked_add(total_income)
        .and_then(|cash| cash.checked_sub(expenses))
        .ok_or_else(overflow)?;

    Ok(DaySummary {
        date,
        opening_cash: day.opening_cash(),
        real_income,
        collected_credit,
        total_income,
        expenses,
        cash_on_hand,
        pending_credit,
        closed: day.is_closed(),
        savings_withdrawal: day.savings_withdrawal(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseCategory, PaymentMethod};
    use chrono::{DateTime, FixedOffset};

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-17T08:00:00-04:00").unwrap()
    }

    fn ride(id: &str, d: u32, amount: i64, method: PaymentMethod) -> Ride {
        Ride::new(id, ymd(d), Amount::new(amount), method, "", at())
    }

    fn expense(d: u32, amount: i64) -> Expense {
        Expense::new("e-1", ymd(d), Amount::new(amount), ExpenseCategory::Fuel, "", at())
    }

    #[test]
    fn test_first_day_scenario() {
        let day = Day::new(ymd(17), Amount::new(20000));
        let rides = vec![
            ride("r-a", 17, 5000, PaymentMethod::Cash),
            ride("r-b", 17, 3000, PaymentMethod::Credit),
        ];
        let summary = summarize(&day, &rides, &[], &[expense(17, 2000)]).unwrap();
        assert_eq!(summary.real_income, Amount::new(5000));
        assert_eq!(summary.collected_credit, Amount::ZERO);
        assert_eq!(summary.expenses, Amount::new(2000));
        assert_eq!(summary.cash_on_hand, Amount::new(23000));
        assert_eq!(summary.pending_credit, Amount::new(3000));
        assert_eq!(summary.total_income, Amount::new(5000));
        assert!(!summary.closed);
    }

    #[test]
    fn test_collected_credit_counts_on_collection_date_only() {
        let mut credit = ride("r-b", 17, 3000, PaymentMethod::Credit);
        credit.collect(ymd(18)).unwrap();
        let collected = vec![credit.clone()];

        let d1 = Day::new(ymd(17), Amount::new(20000));
        let s1 = summarize(&d1, &[credit.clone()], &[], &[]).unwrap();
        assert_eq!(s1.real_income, Amount::ZERO);
        assert_eq!(s1.pending_credit, Amount::ZERO);
        assert_eq!(s1.cash_on_hand, Amount::new(20000));

        let d2 = Day::new(ymd(18), Amount::new(1000));
        let s2 = summarize(&d2, &[], &collected, &[]).unwrap();
        assert_eq!(s2.collected_credit, Amount::new(3000));
        assert_eq!(s2.real_income, Amount::ZERO);
        assert_eq!(s2.cash_on_hand, Amount::new(4000));
    }

    #[test]
    fn test_digital_wallet_is_real_income() {
        let day = Day::new(ymd(17), Amount::new(100));
        let rides = vec![
            ride("r-1", 17, 1500, PaymentMethod::DigitalWallet),
            ride("r-2", 17, 2500, PaymentMethod::Cash),
        ];
        let summary = summarize(&day, &rides, &[], &[]).unwrap();
        assert_eq!(summary.real_income, Amount::new(4000));
        assert_eq!(summary.cash_on_hand, Amount::new(4100));
    }

    #[test]
    fn test_cash_can_drop_below_opening() {
        let day = Day::new(ymd(17), Amount::new(1000));
        let rides = vec![ride("r-1", 17, 9000, PaymentMethod::Credit)];
        let summary = summarize(&day, &rides, &[], &[expense(17, 3000)]).unwrap();
        assert_eq!(summary.cash_on_hand, Amount::new(-2000));
        assert_eq!(summary.pending_credit, Amount::new(9000));
    }

    #[test]
    fn test_records_from_other_dates_are_ignored() {
        let day = Day::new(ymd(17), Amount::new(1000));
        let rides = vec![ride("r-1", 16, 5000, PaymentMethod::Cash)];
        let summary = summarize(&day, &rides, &[], &[expense(18, 700)]).unwrap();
        assert_eq!(summary.cash_on_hand, Amount::new(1000));
    }

    #[test]
    fn test_empty_day() {
        let day = Day::new(ymd(17), Amount::new(500));
        let summary = summarize(&day, &[], &[], &[]).unwrap();
        assert_eq!(summary.total_income, Amount::ZERO);
        assert_eq!(summary.cash_on_hand, Amount::new(500));
    }

    #[test]
    fn test_credit_collected_on_its_own_date() {
        let mut credit = ride("r-b", 17, 3000, PaymentMethod::Credit);
        credit.collect(ymd(17)).unwrap();
        let rides = vec![credit.clone(), ride("r-a", 17, 5000, PaymentMethod::Cash)];
        let day = Day::new(ymd(17), Amount::new(20000));
        let summary = summarize(&day, &rides, &[credit], &[]).unwrap();
        assert_eq!(summary.real_income, Amount::new(5000));
        assert_eq!(summary.collected_credit, Amount::new(3000));
        assert_eq!(summary.pending_credit, Amount::ZERO);
        assert_eq!(summary.cash_on_hand, Amount::new(28000));
    }

    #[test]
    fn test_totals_that_overflow_are_rejected() {
        let day = Day::new(ymd(17), Amount::new(i64::MAX));
        let rides = vec![ride("r-1", 17, 1, PaymentMethod::Cash)];
        let err = summarize(&day, &rides, &[], &[]).unwrap_err();
        assert!(err.is_validation());

        let day = Day::new(ymd(17), Amount::new(1));
        let expenses = vec![expense(17, i64::MAX), expense(17, i64::MAX)];
        let err = summarize(&day, &[], &[], &expenses).unwrap_err();
        assert!(err.is_validation());
    }
}

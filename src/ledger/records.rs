use crate::error::{LedgerError, LedgerResult};
use crate::model::{self, Amount, Expense, ExpenseCategory, PaymentMethod, Ride};
use chrono::{DateTime, FixedOffset, NaiveDate};

/// A request to record a ride. Nothing is written unless it validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRide {
    pub date: NaiveDate,
    pub amount: Amount,
    pub payment_method: Option<PaymentMethod>,
    pub note: Option<String>,
    pub recorded_at: DateTime<FixedOffset>,
}

/// A request to record an expense. Nothing is written unless it validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Amount,
    pub category: Option<ExpenseCategory>,
    pub note: Option<String>,
    pub recorded_at: DateTime<FixedOffset>,
}

impl NewRide {
    pub(super) fn validate(self) -> LedgerResult<Ride> {
        check_amount(self.amount, "ride amount")?;
        let method = self
            .payment_method
            .ok_or_else(|| LedgerError::validation("a payment method is required"))?;
        Ok(Ride::new(
            model::new_ride_id(),
            self.date,
            self.amount,
            method,
            clean_note(self.note),
            self.recorded_at,
        ))
    }
}

impl NewExpense {
    pub(super) fn validate(self) -> LedgerResult<Expense> {
        check_amount(self.amount, "expense amount")?;
        let category = self
            .category
            .ok_or_else(|| LedgerError::validation("an expense category is required"))?;
        Ok(Expense::new(
            model::new_expense_id(),
            self.date,
            self.amount,
            category,
            clean_note(self.note),
            self.recorded_at,
        ))
    }
}

/// The largest amount a single record may carry.
pub(super) const MAX_AMOUNT: Amount = Amount::new(1_000_000_000_000);

pub(super) fn check_amount(amount: Amount, what: &str) -> LedgerResult<()> {
    if !amount.is_positive() {
        return Err(LedgerError::validation(format!(
            "the {what} must be greater than zero, got {amount}"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::validation(format!(
            "the {what} must not exceed {MAX_AMOUNT}, got {amount}"
        )));
    }
    Ok(())
}

fn clean_note(note: Option<String>) -> String {
    note.map(|n| n.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RideStatus;

    fn new_ride(amount: i64, method: Option<PaymentMethod>) -> NewRide {
        NewRide {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            amount: Amount::new(amount),
            payment_method: method,
            note: Some("  Mercado  ".to_string()),
            recorded_at: DateTime::parse_from_rfc3339("2026-10-17T10:00:00-04:00").unwrap(),
        }
    }

    #[test]
    fn test_valid_ride() {
        let ride = new_ride(3000, Some(PaymentMethod::Credit)).validate().unwrap();
        assert!(ride.id().starts_with("r-"));
        assert_eq!(ride.status(), RideStatus::Pending);
        assert_eq!(ride.note(), "Mercado");
    }

    #[test]
    fn test_non_positive_amount() {
        for amount in [0, -5] {
            let err = new_ride(amount, Some(PaymentMethod::Cash))
                .validate()
                .unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_amount_too_large() {
        assert!(new_ride(MAX_AMOUNT.value(), Some(PaymentMethod::Cash))
            .validate()
            .is_ok());
        for amount in [MAX_AMOUNT.value() + 1, i64::MAX] {
            let err = new_ride(amount, Some(PaymentMethod::Cash))
                .validate()
                .unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_missing_method() {
        assert!(new_ride(3000, None).validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_missing_category() {
        let expense = NewExpense {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            amount: Amount::new(2000),
            category: None,
            note: None,
            recorded_at: DateTime::parse_from_rfc3339("2026-10-17T10:00:00-04:00").unwrap(),
        };
        assert!(expense.validate().unwrap_err().is_validation());
    }
}

use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The ledger record for one business date.
///
/// A `Day` is created when the driver starts the day with an opening cash amount and is only
/// ever changed once more, when it is closed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Day {
    pub(crate) date: NaiveDate,
    pub(crate) opening_cash: Amount,
    pub(crate) closed: bool,
    pub(crate) savings_withdrawal: Amount,
}

impl Day {
    /// Creates an open day.
    pub fn new(date: NaiveDate, opening_cash: Amount) -> Self {
        Self {
            date,
            opening_cash,
            closed: false,
            savings_withdrawal: Amount::ZERO,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn opening_cash(&self) -> Amount {
        self.opening_cash
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn savings_withdrawal(&self) -> Amount {
        self.savings_withdrawal
    }

    pub fn state(&self) -> DayState {
        if self.closed {
            DayState::Closed
        } else {
            DayState::Open
        }
    }

    /// Returns the closed version of this day. There is no way back.
    pub(crate) fn into_closed(self, savings_withdrawal: Amount) -> Self {
        Self {
            closed: true,
            savings_withdrawal,
            ..self
        }
    }
}

/// Where a date is in the day lifecycle.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    /// No day has been started for the date.
    NoDay,
    Open,
    Closed,
}

serde_plain::derive_display_from_serialize!(DayState);

impl From<Option<&Day>> for DayState {
    fn from(day: Option<&Day>) -> Self {
        day.map(Day::state).unwrap_or(DayState::NoDay)
    }
}

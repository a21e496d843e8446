use crate::model::Amount;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Fuel,
    Food,
    Repair,
    Other,
}

serde_plain::derive_display_from_serialize!(ExpenseCategory);
serde_plain::derive_fromstr_from_deserialize!(ExpenseCategory);

/// Money spent during a day. Expenses are never changed once recorded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub(crate) id: String,
    pub(crate) date: NaiveDate,
    pub(crate) amount: Amount,
    pub(crate) category: ExpenseCategory,
    pub(crate) note: String,
    pub(crate) recorded_at: DateTime<FixedOffset>,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        amount: Amount,
        category: ExpenseCategory,
        note: impl Into<String>,
        recorded_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            category,
            note: note.into(),
            recorded_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.recorded_at
    }
}

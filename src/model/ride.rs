use crate::error::{LedgerError, LedgerResult};
use crate::model::Amount;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// How a ride was paid for.
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
pub enum PaymentMethod {
    Cash,
    /// A mobile wallet transfer. The money is received at the time of the ride.
    DigitalWallet,
    /// The fare is owed ("fiada") and becomes income only when it is collected.
    Credit,
}

serde_plain::derive_display_from_serialize!(PaymentMethod);
serde_plain::derive_fromstr_from_deserialize!(PaymentMethod);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Pending,
    Paid,
}

serde_plain::derive_display_from_serialize!(RideStatus);
serde_plain::derive_fromstr_from_deserialize!(RideStatus);

/// A completed trip.
///
/// Only `status` and `paid_on_date` ever change, and only once, when a pending credit ride is
/// collected.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Ride {
    pub(crate) id: String,
    pub(crate) date: NaiveDate,
    pub(crate) amount: Amount,
    pub(crate) payment_method: PaymentMethod,
    pub(crate) status: RideStatus,
    pub(crate) note: String,
    pub(crate) recorded_at: DateTime<FixedOffset>,
    pub(crate) paid_on_date: Option<NaiveDate>,
}

impl Ride {
    /// Creates a ride. Credit rides start out pending, everything else is paid on the spot.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        amount: Amount,
        payment_method: PaymentMethod,
        note: impl Into<String>,
        recorded_at: DateTime<FixedOffset>,
    ) -> Self {
        let status = match payment_method {
            PaymentMethod::Credit => RideStatus::Pending,
            PaymentMethod::Cash | PaymentMethod::DigitalWallet => RideStatus::Paid,
        };
        Self {
            id: id.into(),
            date,
            amount,
            payment_method,
            status,
            note: note.into(),
            recorded_at,
            paid_on_date: None,
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

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn status(&self) -> RideStatus {
        self.status
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn recorded_at(&self) -> DateTime<FixedOffset> {
        self.recorded_at
    }

    pub fn paid_on_date(&self) -> Option<NaiveDate> {
        self.paid_on_date
    }

    pub fn is_credit(&self) -> bool {
        self.payment_method == PaymentMethod::Credit
    }

    /// True for a credit ride that has not been collected yet.
    pub fn is_outstanding(&self) -> bool {
        self.is_credit() && self.status == RideStatus::Pending
    }

    /// True when the fare was received at the time of the ride, i.e. it counts as real income on
    /// the ride's own date.
    pub fn is_paid_on_the_spot(&self) -> bool {
        !self.is_credit()
    }

    /// Marks a pending credit ride as paid on `date`.
    ///
    /// # Errors
    /// - `StateConflict` if the ride is not a credit ride or was already collected. The ride is
    ///   left untouched.
    pub(crate) fn collect(&mut self, date: NaiveDate) -> LedgerResult<()> {
        if !self.is_credit() {
            return Err(LedgerError::conflict(format!(
                "ride {} was paid by {} and has nothing to collect",
                self.id, self.payment_method
            )));
        }
        if self.status != RideStatus::Pending {
            let when = self
                .paid_on_date
                .map(|d| format!(" on {d}"))
                .unwrap_or_default();
            return Err(LedgerError::conflict(format!(
                "ride {} was already collected{when}",
                self.id
            )));
        }
        self.status = RideStatus::Paid;
        self.paid_on_date = Some(date);
        Ok(())
    }
}

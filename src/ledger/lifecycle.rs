use crate::error::{LedgerError, LedgerResult};
use crate::ledger::records::MAX_AMOUNT;
use crate::ledger::DaySummary;
use crate::model::{Amount, Day};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The outcome of closing a day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Closing {
    /// The final summary, computed from the same aggregation as any other summary.
    pub summary: DaySummary,
    /// Cash on hand at the moment of closing.
    pub total_before_savings: Amount,
    /// `total_before_savings` less the savings withdrawal.
    pub cash_after_savings: Amount,
    /// The day as persisted.
    pub day: Day,
}

/// Turns the requested savings withdrawal into the amount that is stored. Missing and negative
/// values become zero.
///
/// # Errors
/// - `Validation` if the withdrawal is larger than any single record may be
pub(super) fn coerce_savings(savings_withdrawal: Option<i64>) -> LedgerResult<Amount> {
    match savings_withdrawal {
        Some(value) if value > MAX_AMOUNT.value() => Err(LedgerError::validation(format!(
            "the savings withdrawal must not exceed {MAX_AMOUNT}, got {}",
            Amount::new(value)
        ))),
        Some(value) if value >= 0 => Ok(Amount::new(value)),
        Some(value) => {
            warn!("Savings withdrawal {value} is negative, recording 0 instead");
            Ok(Amount::ZERO)
        }
        None => Ok(Amount::ZERO),
    }
}
